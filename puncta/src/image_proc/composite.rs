//! Vertical stacking of pipeline output rasters.

use ndarray::Array3;

use crate::error::DetectError;

/// Stack rasters vertically in the given order.
///
/// All layers must share width and channel count; heights may differ.
///
/// # Returns
/// * One raster whose height is the sum of the layer heights
/// * `Err(DetectError::DimensionMismatch)` if a layer's width differs
pub fn stack_vertical(layers: &[&Array3<u8>]) -> Result<Array3<u8>, DetectError> {
    let first = layers
        .first()
        .ok_or_else(|| DetectError::InvalidParameter("no layers to stack".to_string()))?;
    let (_, width, channels) = first.dim();

    let mut total_height = 0;
    for layer in layers {
        let (height, layer_width, layer_channels) = layer.dim();
        if layer_width != width || layer_channels != channels {
            return Err(DetectError::DimensionMismatch {
                expected: (width, channels),
                actual: (layer_width, layer_channels),
            });
        }
        total_height += height;
    }

    let mut stacked = Array3::zeros((total_height, width, channels));
    let mut offset = 0;
    for layer in layers {
        let (height, _, _) = layer.dim();
        stacked
            .slice_mut(ndarray::s![offset..offset + height, .., ..])
            .assign(layer);
        offset += height;
    }

    Ok(stacked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacks_three_layers_in_order() {
        let a = Array3::from_elem((2, 3, 3), 1u8);
        let b = Array3::from_elem((1, 3, 3), 2u8);
        let c = Array3::from_elem((2, 3, 3), 3u8);

        let stacked = stack_vertical(&[&a, &b, &c]).unwrap();
        assert_eq!(stacked.dim(), (5, 3, 3));
        assert_eq!(stacked[[0, 0, 0]], 1);
        assert_eq!(stacked[[2, 1, 1]], 2);
        assert_eq!(stacked[[4, 2, 2]], 3);
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let a = Array3::from_elem((2, 3, 3), 1u8);
        let b = Array3::from_elem((2, 4, 3), 1u8);
        assert!(matches!(
            stack_vertical(&[&a, &b]),
            Err(DetectError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn empty_layer_list_is_rejected() {
        assert!(stack_vertical(&[]).is_err());
    }
}
