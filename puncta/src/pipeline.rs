//! End-to-end puncta detection pipeline.
//!
//! One invocation runs load → normalize → threshold (red, blue) → fuse →
//! detect → annotate over a single image and minimum-area threshold. The
//! pipeline is a pure function of its inputs: no state is retained across
//! invocations, and a run either returns a complete [`DetectionResult`] or
//! fails with a typed error before producing output.

use std::path::Path;

use ndarray::Array3;

use crate::config::DetectionConfig;
use crate::error::DetectError;
use crate::image_proc::{
    adaptive_threshold, apply_mask, draw_markers, filter_components, fuse_masks, label_components,
    load_raster, normalize_red, resize_to_cap, split_channels, stack_vertical,
};

/// Output of one pipeline invocation.
///
/// Created per call, consumed by compositing or persisted by the caller, then
/// discarded. The pipeline itself keeps nothing.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// Number of components surviving the minimum-area filter.
    pub count: usize,
    /// Centroid `(x, y)` per surviving component, in discovery order.
    pub centroids: Vec<(usize, usize)>,
    /// Source raster with a star marker at each centroid.
    pub annotated: Array3<u8>,
    /// Source raster with everything outside the fused mask zeroed.
    pub masked: Array3<u8>,
    /// The (size-capped) source raster itself.
    pub source: Array3<u8>,
}

impl DetectionResult {
    /// Vertically stack annotated, original, and masked rasters, in that
    /// order, into one output raster.
    pub fn composite(&self) -> Result<Array3<u8>, DetectError> {
        stack_vertical(&[&self.annotated, &self.source, &self.masked])
    }
}

/// Configured detection pipeline.
pub struct Pipeline {
    config: DetectionConfig,
}

impl Pipeline {
    /// Create a pipeline, validating the configuration up front.
    pub fn new(config: DetectionConfig) -> Result<Self, DetectError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Decode an image file into a size-capped raster.
    ///
    /// Callers sweeping several minimum-area thresholds over one image should
    /// load once and hand the raster to [`Pipeline::process_raster`]
    /// repeatedly instead of re-decoding per threshold.
    pub fn load(&self, path: &Path) -> Result<Array3<u8>, DetectError> {
        load_raster(path, self.config.max_dimension)
    }

    /// Load an image and run the full pipeline on it.
    pub fn process_path(&self, path: &Path, min_area: usize) -> Result<DetectionResult, DetectError> {
        let raster = self.load(path)?;
        self.process_raster(&raster, min_area)
    }

    /// Run the full pipeline on an in-memory raster.
    ///
    /// # Arguments
    /// * `raster` - 3-channel RGB raster; downscaled first if it exceeds the
    ///   configured dimension cap
    /// * `min_area` - Minimum component area in pixels, >= 1
    pub fn process_raster(
        &self,
        raster: &Array3<u8>,
        min_area: usize,
    ) -> Result<DetectionResult, DetectError> {
        if min_area < 1 {
            return Err(DetectError::InvalidParameter(
                "minimum component area must be >= 1".to_string(),
            ));
        }

        let source = resize_to_cap(raster, self.config.max_dimension);
        let channels = split_channels(&source);
        let red = normalize_red(&channels.red)?;

        let red_mask = adaptive_threshold(red.view(), self.config.red_window, self.config.red_bias)?;
        let blue_mask = adaptive_threshold(
            channels.blue.view(),
            self.config.blue_window,
            self.config.blue_bias,
        )?;

        let combined = fuse_masks(&red_mask, &blue_mask)?;
        let masked = apply_mask(&source, &combined)?;

        let (_, components) = label_components(combined.view());
        let total = components.len();
        let kept = filter_components(components, min_area)?;
        let centroids: Vec<(usize, usize)> =
            kept.iter().map(|component| component.centroid()).collect();
        log::debug!(
            "{} of {} components survive min_area {}",
            kept.len(),
            total,
            min_area
        );

        let annotated = draw_markers(
            &source,
            &centroids,
            self.config.marker_size,
            self.config.marker_color,
        );

        Ok(DetectionResult {
            count: centroids.len(),
            centroids,
            annotated,
            masked,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> Pipeline {
        Pipeline::new(DetectionConfig::default()).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = DetectionConfig {
            red_window: 2,
            ..Default::default()
        };
        assert!(Pipeline::new(config).is_err());
    }

    #[test]
    fn zero_min_area_is_rejected() {
        let raster = Array3::from_elem((10, 10, 3), 50u8);
        assert!(matches!(
            pipeline().process_raster(&raster, 0),
            Err(DetectError::InvalidParameter(_))
        ));
    }

    #[test]
    fn all_zero_red_channel_fails_without_output() {
        // Blue-only image: red plane is entirely zero.
        let mut raster = Array3::zeros((10, 10, 3));
        for y in 0..10 {
            for x in 0..10 {
                raster[[y, x, 2]] = 90;
            }
        }
        assert!(matches!(
            pipeline().process_raster(&raster, 1),
            Err(DetectError::DegenerateChannel)
        ));
    }
}
