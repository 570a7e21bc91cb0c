//! Request and result structures for a single conversion.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::dimensions::{CropBox, Dimensions};

/// Optional start/stop bounds of the source segment, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Segment start. `None` means the beginning of the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    /// Segment stop. `None` means the end of the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<f64>,
}

impl TimeRange {
    /// A range covering the whole file.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// True when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.stop.is_none()
    }
}

/// Source stream facts gathered by probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Native frame size.
    pub dimensions: Dimensions,
    /// Average frame rate, rounded up to a whole number.
    pub frame_rate: u32,
}

/// A fully validated conversion request.
///
/// Built by [`crate::validate::validate`]; immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Source video file.
    pub input: PathBuf,
    /// Target GIF path.
    pub output: PathBuf,
    /// Output size.
    pub dimensions: Dimensions,
    /// Output frame rate.
    pub frame_rate: u32,
    /// Optional crop applied before scaling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropBox>,
    /// Segment bounds.
    #[serde(default)]
    pub range: TimeRange,
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// The GIF that was written.
    pub output_path: PathBuf,
    /// Palette pass command line, as logged.
    pub palette_command: String,
    /// Render pass command line, as logged.
    pub render_command: String,
}

/// Default output path for an input: same location, `.gif` extension.
pub fn derive_output_path(input: &Path) -> PathBuf {
    input.with_extension("gif")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_swaps_extension() {
        assert_eq!(
            derive_output_path(Path::new("/videos/clip.mp4")),
            PathBuf::from("/videos/clip.gif")
        );
        assert_eq!(
            derive_output_path(Path::new("clip")),
            PathBuf::from("clip.gif")
        );
    }

    #[test]
    fn unbounded_range() {
        assert!(TimeRange::unbounded().is_unbounded());
        let bounded = TimeRange {
            start: Some(1.0),
            stop: None,
        };
        assert!(!bounded.is_unbounded());
    }

    #[test]
    fn request_serde_round_trip() {
        let request = ConversionRequest {
            input: PathBuf::from("in.mp4"),
            output: PathBuf::from("out.gif"),
            dimensions: Dimensions::new(640, 360),
            frame_rate: 24,
            crop: Some(CropBox::new(100, 100, 10, 20)),
            range: TimeRange {
                start: Some(5.5),
                stop: Some(10.0),
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        let back: ConversionRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn crop_is_omitted_when_absent() {
        let request = ConversionRequest {
            input: PathBuf::from("in.mp4"),
            output: PathBuf::from("out.gif"),
            dimensions: Dimensions::new(640, 360),
            frame_rate: 24,
            crop: None,
            range: TimeRange::unbounded(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("crop"));
    }
}
