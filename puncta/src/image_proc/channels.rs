//! Channel isolation and red-channel background normalization.

use ndarray::{Array2, Array3};

use crate::error::DetectError;

/// Single-channel planes of a color raster, by name.
///
/// Named fields replace the positional blue/green/red plane convention of the
/// original storage format, so nothing downstream depends on plane order.
#[derive(Debug, Clone)]
pub struct ChannelSet {
    pub blue: Array2<u8>,
    pub green: Array2<u8>,
    pub red: Array2<u8>,
}

/// Split an RGB raster into its single-channel planes.
pub fn split_channels(raster: &Array3<u8>) -> ChannelSet {
    let (height, width, _) = raster.dim();
    let mut red = Array2::zeros((height, width));
    let mut green = Array2::zeros((height, width));
    let mut blue = Array2::zeros((height, width));

    for y in 0..height {
        for x in 0..width {
            red[[y, x]] = raster[[y, x, 0]];
            green[[y, x]] = raster[[y, x, 1]];
            blue[[y, x]] = raster[[y, x, 2]];
        }
    }

    ChannelSet { blue, green, red }
}

/// Replace zero-valued pixels with the mean of the strictly-positive ones.
///
/// Compensates for sensor dropout and background holes in the red channel
/// before adaptive thresholding. Pure transformation: the input plane is
/// left untouched and a new plane is returned.
///
/// # Returns
/// * New plane with zeros substituted by the rounded mean
/// * `Err(DetectError::DegenerateChannel)` if the plane is entirely zero
pub fn normalize_red(red: &Array2<u8>) -> Result<Array2<u8>, DetectError> {
    let mut sum = 0u64;
    let mut count = 0u64;
    for &value in red.iter() {
        if value > 0 {
            sum += value as u64;
            count += 1;
        }
    }

    if count == 0 {
        return Err(DetectError::DegenerateChannel);
    }

    let mean = (sum as f64 / count as f64).round() as u8;
    log::debug!("red channel fallback mean: {mean}");

    Ok(red.mapv(|value| if value == 0 { mean } else { value }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn split_orders_planes_by_name() {
        let mut raster = Array3::zeros((1, 2, 3));
        raster[[0, 0, 0]] = 10; // red
        raster[[0, 0, 1]] = 20; // green
        raster[[0, 0, 2]] = 30; // blue
        raster[[0, 1, 2]] = 40;

        let channels = split_channels(&raster);
        assert_eq!(channels.red[[0, 0]], 10);
        assert_eq!(channels.green[[0, 0]], 20);
        assert_eq!(channels.blue[[0, 0]], 30);
        assert_eq!(channels.blue[[0, 1]], 40);
    }

    #[test]
    fn zeros_are_replaced_with_rounded_mean() {
        let red = arr2(&[[0, 100], [101, 0]]);
        let normalized = normalize_red(&red).unwrap();

        // mean of {100, 101} rounds to 101 (round half up on .5)
        assert_eq!(normalized, arr2(&[[101, 100], [101, 101]]));
    }

    #[test]
    fn positive_pixels_are_untouched() {
        let red = arr2(&[[1, 2], [3, 4]]);
        let normalized = normalize_red(&red).unwrap();
        assert_eq!(normalized, red);
    }

    #[test]
    fn all_zero_channel_is_degenerate() {
        let red = Array2::<u8>::zeros((4, 4));
        assert!(matches!(
            normalize_red(&red),
            Err(DetectError::DegenerateChannel)
        ));
    }
}
