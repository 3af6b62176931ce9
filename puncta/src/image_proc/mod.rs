//! Image processing building blocks for the puncta detection pipeline.
//!
//! Loading, channel normalization, adaptive thresholding, mask fusion,
//! connected-component extraction, annotation, and compositing. The pipeline
//! in [`crate::pipeline`] chains these; each piece is also usable on its own.

pub mod annotate;
pub mod channels;
pub mod composite;
pub mod fusion;
pub mod loader;
pub mod raster;
pub mod segment;
pub mod thresholding;

// Re-export key functionality for easier access
pub use annotate::draw_markers;
pub use channels::{normalize_red, split_channels, ChannelSet};
pub use composite::stack_vertical;
pub use fusion::{apply_mask, fuse_masks};
pub use loader::{load_raster, resize_to_cap, FormatClass};
pub use raster::{raster_to_rgb_image, rgb_image_to_raster};
pub use segment::{filter_components, label_components, BoundingBox, Component, Label};
pub use thresholding::{adaptive_threshold, local_gaussian_mean};
