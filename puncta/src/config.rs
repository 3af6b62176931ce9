//! Detection pipeline configuration.
//!
//! All tuning knobs of the pipeline live in [`DetectionConfig`] and are passed
//! in explicitly at construction; there is no global mutable state. The
//! defaults are the tuned operating points of the original counting tool.

use serde::{Deserialize, Serialize};

use crate::error::DetectError;

/// Settings for the puncta detection pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionConfig {
    /// Longest allowed image dimension in pixels. Larger inputs are
    /// downscaled with area averaging so the longer side equals this cap.
    pub max_dimension: usize,
    /// Adaptive-threshold neighborhood size for the red channel (odd, >= 3).
    pub red_window: usize,
    /// Bias added to the local mean for the red channel (may be negative).
    pub red_bias: f64,
    /// Adaptive-threshold neighborhood size for the blue channel (odd, >= 3).
    pub blue_window: usize,
    /// Bias added to the local mean for the blue channel (may be negative).
    pub blue_bias: f64,
    /// Full extent of the star marker glyph in pixels.
    pub marker_size: usize,
    /// Marker color as RGB.
    pub marker_color: [u8; 3],
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_dimension: 1500,
            red_window: 55,
            red_bias: -31.0,
            blue_window: 55,
            blue_bias: -21.0,
            marker_size: 4,
            marker_color: [255, 255, 255],
        }
    }
}

impl DetectionConfig {
    /// Validate the configuration.
    ///
    /// # Returns
    /// * `Ok(())` if every parameter is in range
    /// * `Err(DetectError::InvalidParameter)` otherwise
    pub fn validate(&self) -> Result<(), DetectError> {
        if self.max_dimension == 0 {
            return Err(DetectError::InvalidParameter(
                "max_dimension must be positive".to_string(),
            ));
        }
        for (name, window) in [("red_window", self.red_window), ("blue_window", self.blue_window)] {
            if window < 3 || window % 2 == 0 {
                return Err(DetectError::InvalidParameter(format!(
                    "{name} must be an odd integer >= 3, got {window}"
                )));
            }
        }
        if self.marker_size == 0 {
            return Err(DetectError::InvalidParameter(
                "marker_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(DetectionConfig::default().validate().is_ok());
    }

    #[test]
    fn even_window_is_rejected() {
        let config = DetectionConfig {
            red_window: 54,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DetectError::InvalidParameter(_))
        ));
    }

    #[test]
    fn tiny_window_is_rejected() {
        let config = DetectionConfig {
            blue_window: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
