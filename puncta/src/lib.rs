//! Puncta detection for fluorescence microscopy images.
//!
//! Detects and counts punctate fluorescent signal clusters ("stars") in a
//! single image. The pipeline stages are:
//!
//! 1. **Load** – decode to a 3-channel raster, cap the longest side at the
//!    configured limit with area-averaging downscale.
//! 2. **Normalize** – isolate the red and blue planes; fill red-channel
//!    dropout zeros with the mean of the non-zero pixels.
//! 3. **Threshold** – adaptive Gaussian-local-mean binarization per channel
//!    with channel-specific bias constants.
//! 4. **Fuse** – pixelwise AND of the two masks; masked visualization.
//! 5. **Detect** – 8-connected component labeling with minimum-area
//!    filtering and bounding-box centroids.
//! 6. **Annotate / composite** – star markers at centroids, then a vertical
//!    [annotated, original, masked] stack.
//!
//! # Public API
//! [`Pipeline`] and [`DetectionConfig`] are the primary entry points;
//! [`DetectionResult`] carries counts, centroids, and the output rasters.
//! The individual stages live in [`image_proc`] and can be used directly.
//!
//! Batch orchestration (directory sweeps, CSV logging, artifact persistence)
//! belongs to the `sweep` driver crate, which calls into this one.

pub mod config;
pub mod error;
pub mod image_proc;
pub mod pipeline;

pub use config::DetectionConfig;
pub use error::DetectError;
pub use pipeline::{DetectionResult, Pipeline};
