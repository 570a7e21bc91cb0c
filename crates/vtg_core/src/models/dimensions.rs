//! Size-related data structures (output dimensions, crop regions, presets).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Output size used before anything has been probed or configured.
pub const DEFAULT_DIMENSIONS: Dimensions = Dimensions {
    width: 420,
    height: 333,
};

/// Output frame rate used when the source rate is unknown.
pub const DEFAULT_FRAME_RATE: u32 = 24;

/// Reference aspect ratio used before a source has been probed (16:9).
pub const DEFAULT_ASPECT_RATIO: f64 = 16.0 / 9.0;

/// An output size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Create a new dimension pair.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width-to-height ratio. `None` when the height is 0.
    pub fn aspect(&self) -> Option<f64> {
        if self.height == 0 {
            return None;
        }
        Some(self.width as f64 / self.height as f64)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A rectangular region cut out of the source frame before scaling.
///
/// Offsets are measured from the top-left corner. Values are stored
/// already validated (width/height positive, offsets non-negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBox {
    /// Region width in pixels.
    pub width: u32,
    /// Region height in pixels.
    pub height: u32,
    /// Horizontal offset of the region.
    pub x: u32,
    /// Vertical offset of the region.
    pub y: u32,
}

impl CropBox {
    /// Create a new crop region.
    pub fn new(width: u32, height: u32, x: u32, y: u32) -> Self {
        Self {
            width,
            height,
            x,
            y,
        }
    }
}

/// A named output size the front-end can offer as a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePreset {
    /// Short name used to select the preset (e.g., "720p").
    pub name: &'static str,
    /// Display label (e.g., "720p (1280x720)").
    pub label: &'static str,
    /// Preset width in pixels.
    pub width: u32,
    /// Preset height in pixels.
    pub height: u32,
}

impl SizePreset {
    /// Preset size as a [`Dimensions`] value.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// All size presets, in display order.
pub const SIZE_PRESETS: &[SizePreset] = &[
    SizePreset {
        name: "360p",
        label: "360p (480x360)",
        width: 480,
        height: 360,
    },
    SizePreset {
        name: "720p",
        label: "720p (1280x720)",
        width: 1280,
        height: 720,
    },
    SizePreset {
        name: "1080p",
        label: "1080p (1920x1080)",
        width: 1920,
        height: 1080,
    },
    SizePreset {
        name: "square",
        label: "Square (500x500)",
        width: 500,
        height: 500,
    },
    SizePreset {
        name: "instagram",
        label: "Instagram (1080x1350)",
        width: 1080,
        height: 1350,
    },
    SizePreset {
        name: "story",
        label: "Story (1080x1920)",
        width: 1080,
        height: 1920,
    },
];

/// Look up a preset by its short name (case-insensitive).
pub fn find_preset(name: &str) -> Option<&'static SizePreset> {
    SIZE_PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}
