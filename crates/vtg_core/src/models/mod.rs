//! Data models for Video to GIF.
//!
//! Plain data shared across the crate: sizes, crop regions and named
//! presets, validated conversion requests and reports, and the facts a
//! probe reports about a source file.

mod dimensions;
mod request;

pub use dimensions::{
    find_preset, CropBox, Dimensions, SizePreset, DEFAULT_ASPECT_RATIO, DEFAULT_DIMENSIONS,
    DEFAULT_FRAME_RATE, SIZE_PRESETS,
};
pub use request::{
    derive_output_path, ConversionReport, ConversionRequest, SourceInfo, TimeRange,
};
