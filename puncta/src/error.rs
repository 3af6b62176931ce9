//! Error types for the detection pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the detection pipeline.
///
/// Every precondition violation fails immediately with one of these variants;
/// the pipeline never retries and never returns a partial result. Callers
/// (typically the batch sweep driver) decide whether to skip or abort.
#[derive(Error, Debug)]
pub enum DetectError {
    /// The path could not be read or decoded as an image.
    #[error("failed to load image {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The red channel contains no strictly-positive pixels, so the
    /// zero-replacement mean is undefined.
    #[error("red channel is entirely zero; fallback mean is undefined")]
    DegenerateChannel,

    /// Two rasters or masks that must agree in size do not.
    #[error("dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A caller-supplied parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
