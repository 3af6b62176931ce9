//! Image loading and size capping.
//!
//! Decodes a source file into a 3-channel RGB raster and, when either spatial
//! dimension exceeds the configured cap, uniformly downscales with area
//! averaging so the longer side equals the cap exactly. Upscaling never
//! occurs.

use std::path::Path;

use ndarray::Array3;

use crate::error::DetectError;
use crate::image_proc::raster::rgb_image_to_raster;

/// Broad class of the source file, keyed on its extension.
///
/// Scientific TIFF stacks and conventional image formats both route through
/// the same decoder; the distinction exists for diagnostics and because the
/// loading contract differs: higher bit-depth TIFF sources are expected to be
/// pre-normalized to 8 bits by the caller (the decoder's channel reduction is
/// applied otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatClass {
    /// Two-dimensional scientific TIFF (`.tif` / `.tiff`).
    ScientificTiff,
    /// Conventional raster formats (PNG, JPEG, BMP, ...).
    Conventional,
}

impl FormatClass {
    /// Classify a path by its extension.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("tif") | Some("tiff") => Self::ScientificTiff,
            _ => Self::Conventional,
        }
    }
}

/// Load an image file as a 3-channel raster, capping the longest dimension.
///
/// # Arguments
/// * `path` - Source image file
/// * `max_dimension` - Longest allowed side in pixels
///
/// # Returns
/// * RGB raster of shape `(height, width, 3)` with the longer side at most
///   `max_dimension`
/// * `Err(DetectError::Load)` if the path is unreadable or undecodable
pub fn load_raster(path: &Path, max_dimension: usize) -> Result<Array3<u8>, DetectError> {
    let format = FormatClass::from_path(path);
    log::debug!("loading {:?} ({:?})", path, format);

    let decoded = image::open(path).map_err(|source| DetectError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    let raster = rgb_image_to_raster(&decoded.to_rgb8());
    Ok(resize_to_cap(&raster, max_dimension))
}

/// Downscale a raster so its longer side equals `max_dimension`, preserving
/// aspect ratio. Rasters already within the cap are returned unchanged.
///
/// Shrinking uses area averaging: each output pixel is the coverage-weighted
/// mean of the source box it spans, which minimizes aliasing.
pub fn resize_to_cap(raster: &Array3<u8>, max_dimension: usize) -> Array3<u8> {
    let (height, width, channels) = raster.dim();
    let longest = height.max(width);
    if longest <= max_dimension {
        return raster.clone();
    }

    let scale = max_dimension as f64 / longest as f64;
    let new_height = (height as f64 * scale).round() as usize;
    let new_width = (width as f64 * scale).round() as usize;
    log::debug!(
        "resizing {}x{} -> {}x{}",
        width,
        height,
        new_width,
        new_height
    );

    // Per-axis coverage spans: output cell i averages source interval
    // [i*step, (i+1)*step) with fractional end weights.
    let row_spans = coverage_spans(height, new_height);
    let col_spans = coverage_spans(width, new_width);

    let mut out = Array3::zeros((new_height, new_width, channels));
    for (oy, rows) in row_spans.iter().enumerate() {
        for (ox, cols) in col_spans.iter().enumerate() {
            let mut total_weight = 0.0;
            let mut sums = [0.0f64; 3];
            for &(y, wy) in rows {
                for &(x, wx) in cols {
                    let weight = wy * wx;
                    total_weight += weight;
                    for (c, sum) in sums.iter_mut().enumerate().take(channels) {
                        *sum += raster[[y, x, c]] as f64 * weight;
                    }
                }
            }
            for (c, sum) in sums.iter().enumerate().take(channels) {
                out[[oy, ox, c]] = (sum / total_weight).round() as u8;
            }
        }
    }

    out
}

/// For each of `dst` output cells over a `src`-long axis, list the source
/// indices it covers together with their fractional coverage weights.
fn coverage_spans(src: usize, dst: usize) -> Vec<Vec<(usize, f64)>> {
    let step = src as f64 / dst as f64;
    let mut spans = Vec::with_capacity(dst);

    for i in 0..dst {
        let start = i as f64 * step;
        let end = ((i + 1) as f64 * step).min(src as f64);
        let first = start.floor() as usize;
        let last = (end.ceil() as usize).min(src);

        let mut cells = Vec::with_capacity(last - first);
        for cell in first..last {
            let overlap = end.min((cell + 1) as f64) - start.max(cell as f64);
            if overlap > 0.0 {
                cells.push((cell, overlap));
            }
        }
        spans.push(cells);
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(height: usize, width: usize, value: u8) -> Array3<u8> {
        Array3::from_elem((height, width, 3), value)
    }

    #[test]
    fn format_class_from_extension() {
        assert_eq!(
            FormatClass::from_path(Path::new("a/b/scan.TIF")),
            FormatClass::ScientificTiff
        );
        assert_eq!(
            FormatClass::from_path(Path::new("region.png")),
            FormatClass::Conventional
        );
    }

    #[test]
    fn small_image_passes_through_unchanged() {
        let raster = uniform(600, 800, 42);
        let out = resize_to_cap(&raster, 1500);
        assert_eq!(out, raster);
    }

    #[test]
    fn long_side_lands_exactly_on_cap() {
        let raster = uniform(1000, 3000, 42);
        let out = resize_to_cap(&raster, 1500);
        assert_eq!(out.dim(), (500, 1500, 3));

        let tall = uniform(2000, 1000, 7);
        let out = resize_to_cap(&tall, 1500);
        assert_eq!(out.dim(), (1500, 750, 3));
    }

    #[test]
    fn area_average_preserves_uniform_intensity() {
        let raster = uniform(1000, 2000, 137);
        let out = resize_to_cap(&raster, 1500);
        assert!(out.iter().all(|&v| v == 137));
    }

    #[test]
    fn area_average_blends_partial_coverage() {
        // 2x downscale of a checker column pattern averages adjacent pixels.
        let mut raster = Array3::zeros((2, 4000, 3));
        for x in (0..4000).step_by(2) {
            for c in 0..3 {
                raster[[0, x, c]] = 200;
                raster[[1, x, c]] = 200;
            }
        }
        let out = resize_to_cap(&raster, 2000);
        assert_eq!(out.dim(), (1, 2000, 3));
        assert!(out.iter().all(|&v| v == 100));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_raster(Path::new("/nonexistent/image.png"), 1500).unwrap_err();
        assert!(matches!(err, DetectError::Load { .. }));
    }
}
