//! Centroid annotation with star-shaped markers.

use ndarray::Array3;

/// Draw a star glyph at each centroid on a copy of the raster.
///
/// The glyph is a horizontal, vertical, and two diagonal 1 px strokes through
/// the centroid, `size / 2` pixels in each direction, clipped at the image
/// border. The input raster is never mutated, so it stays available for
/// side-by-side comparison in the composite.
pub fn draw_markers(
    raster: &Array3<u8>,
    centroids: &[(usize, usize)],
    size: usize,
    color: [u8; 3],
) -> Array3<u8> {
    let mut annotated = raster.clone();
    let (height, width, _) = annotated.dim();
    let half = (size / 2) as isize;

    for &(cx, cy) in centroids {
        for d in -half..=half {
            let arms = [
                (cx as isize + d, cy as isize),     // horizontal
                (cx as isize, cy as isize + d),     // vertical
                (cx as isize + d, cy as isize + d), // falling diagonal
                (cx as isize + d, cy as isize - d), // rising diagonal
            ];
            for (x, y) in arms {
                if x >= 0 && x < width as isize && y >= 0 && y < height as isize {
                    for (c, &value) in color.iter().enumerate() {
                        annotated[[y as usize, x as usize, c]] = value;
                    }
                }
            }
        }
    }

    annotated
}
