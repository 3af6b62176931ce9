//! Binary mask fusion and masked visualization.

use ndarray::{Array2, Array3};

use crate::error::DetectError;

/// Pixelwise logical AND of two binary masks.
///
/// # Returns
/// * Mask that is signal exactly where both inputs are signal
/// * `Err(DetectError::DimensionMismatch)` if the masks differ in size
pub fn fuse_masks(a: &Array2<bool>, b: &Array2<bool>) -> Result<Array2<bool>, DetectError> {
    if a.dim() != b.dim() {
        return Err(DetectError::DimensionMismatch {
            expected: a.dim(),
            actual: b.dim(),
        });
    }

    let mut fused = a.clone();
    fused.zip_mut_with(b, |lhs, &rhs| *lhs = *lhs && rhs);
    Ok(fused)
}

/// Zero every raster pixel outside the mask.
///
/// Returns a new raster; the source is untouched.
pub fn apply_mask(raster: &Array3<u8>, mask: &Array2<bool>) -> Result<Array3<u8>, DetectError> {
    let (height, width, channels) = raster.dim();
    if mask.dim() != (height, width) {
        return Err(DetectError::DimensionMismatch {
            expected: (height, width),
            actual: mask.dim(),
        });
    }

    let mut masked = raster.clone();
    for y in 0..height {
        for x in 0..width {
            if !mask[[y, x]] {
                for c in 0..channels {
                    masked[[y, x, c]] = 0;
                }
            }
        }
    }

    Ok(masked)
}
