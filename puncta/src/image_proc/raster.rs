//! Conversions between ndarray rasters and `image` crate buffers.
//!
//! Color rasters are `Array3<u8>` with shape `(height, width, 3)` in RGB
//! plane order. Array indices `[y, x, c]` map to pixel coordinates `(x, y)`;
//! note that array dimensions are (height, width) while image dimensions are
//! (width, height).

use image::{Rgb, RgbImage};
use ndarray::Array3;

/// Converts an `image::RgbImage` to an `Array3<u8>` raster.
pub fn rgb_image_to_raster(img: &RgbImage) -> Array3<u8> {
    let (width, height) = img.dimensions();
    let mut raster = Array3::zeros((height as usize, width as usize, 3));

    for (x, y, pixel) in img.enumerate_pixels() {
        for c in 0..3 {
            raster[[y as usize, x as usize, c]] = pixel.0[c];
        }
    }

    raster
}

/// Converts an `Array3<u8>` raster back to an `image::RgbImage`.
///
/// # Panics
/// Panics if the raster's channel dimension is not 3.
pub fn raster_to_rgb_image(raster: &Array3<u8>) -> RgbImage {
    let (height, width, channels) = raster.dim();
    assert_eq!(channels, 3, "expected a 3-channel raster");

    let mut img = RgbImage::new(width as u32, height as u32);

    for y in 0..height {
        for x in 0..width {
            let pixel = Rgb([
                raster[[y, x, 0]],
                raster[[y, x, 1]],
                raster[[y, x, 2]],
            ]);
            img.put_pixel(x as u32, y as u32, pixel);
        }
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_pixels() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(0, 0, Rgb([10, 20, 30]));
        img.put_pixel(2, 1, Rgb([200, 100, 50]));

        let raster = rgb_image_to_raster(&img);
        assert_eq!(raster.dim(), (2, 3, 3));
        assert_eq!(raster[[0, 0, 0]], 10);
        assert_eq!(raster[[1, 2, 2]], 50);

        let back = raster_to_rgb_image(&raster);
        assert_eq!(back, img);
    }
}
