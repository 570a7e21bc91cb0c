//! Aspect-ratio bookkeeping for the linked width/height fields.
//!
//! The engine is plain state: the front-end reports edits (`set_width`,
//! `set_height`, presets, lock toggles) and reads back both dimensions.
//! Derivation of the opposite field is a pure function, so there is no
//! re-entrancy to guard against when both fields change.

use std::fmt;

use crate::models::{Dimensions, DEFAULT_ASPECT_RATIO, DEFAULT_DIMENSIONS};

/// Which of the two linked fields was edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionField {
    Width,
    Height,
}

/// Derive the opposite dimension for an edited field under a reference
/// ratio.
///
/// Returns `None` when the ratio is unusable, the edited value is 0, or
/// the derived value would round to 0; the caller then leaves the other
/// field as it was.
pub fn derive_other(changed: DimensionField, value: u32, reference_ratio: f64) -> Option<u32> {
    if value == 0 || !reference_ratio.is_finite() || reference_ratio <= 0.0 {
        return None;
    }
    let derived = match changed {
        DimensionField::Width => (value as f64 / reference_ratio).round(),
        DimensionField::Height => (value as f64 * reference_ratio).round(),
    };
    if derived < 1.0 || derived > u32::MAX as f64 {
        return None;
    }
    Some(derived as u32)
}

/// Reduced `w:h` ratio plus its decimal value, for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioDisplay {
    /// Ratio reduced by the greatest common divisor, e.g. `(16, 9)`.
    pub reduced: (u32, u32),
    /// Width divided by height.
    pub decimal: f64,
}

impl fmt::Display for RatioDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} ({:.2}:1)",
            self.reduced.0, self.reduced.1, self.decimal
        )
    }
}

/// Keeps width and height linked while the aspect lock is engaged.
#[derive(Debug, Clone)]
pub struct AspectRatioEngine {
    width: u32,
    height: u32,
    reference_ratio: f64,
    locked: bool,
    source: Option<Dimensions>,
    fallback: Dimensions,
}

impl Default for AspectRatioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AspectRatioEngine {
    /// Engine in its initial state: built-in default size, 16:9
    /// reference, lock engaged.
    pub fn new() -> Self {
        Self::with_defaults(DEFAULT_DIMENSIONS)
    }

    /// Engine seeded with configured default dimensions; `reset` falls
    /// back to these when no source has been probed.
    pub fn with_defaults(defaults: Dimensions) -> Self {
        Self {
            width: defaults.width,
            height: defaults.height,
            reference_ratio: DEFAULT_ASPECT_RATIO,
            locked: true,
            source: None,
            fallback: defaults,
        }
    }

    /// Current dimensions.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Whether the aspect lock is engaged.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The ratio derivations are computed against.
    pub fn reference_ratio(&self) -> f64 {
        self.reference_ratio
    }

    /// Probed source dimensions, when known.
    pub fn source(&self) -> Option<Dimensions> {
        self.source
    }

    /// Record a width edit; derives the height while locked.
    pub fn set_width(&mut self, width: u32) {
        self.width = width;
        if self.locked {
            if let Some(h) = derive_other(DimensionField::Width, width, self.reference_ratio) {
                self.height = h;
            }
        }
    }

    /// Record a height edit; derives the width while locked.
    pub fn set_height(&mut self, height: u32) {
        self.height = height;
        if self.locked {
            if let Some(w) = derive_other(DimensionField::Height, height, self.reference_ratio) {
                self.width = w;
            }
        }
    }

    /// Set both dimensions at once, deriving neither.
    ///
    /// While locked the preset also redefines the reference ratio.
    pub fn apply_preset(&mut self, dims: Dimensions) {
        self.width = dims.width;
        self.height = dims.height;
        if self.locked {
            if let Some(ratio) = dims.aspect() {
                self.reference_ratio = ratio;
            }
        }
    }

    /// Engage or release the lock. Re-locking adopts the current
    /// dimensions' ratio as the new reference when both are positive.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        if locked && self.width > 0 && self.height > 0 {
            self.reference_ratio = self.width as f64 / self.height as f64;
        }
    }

    /// Flip the lock and return the new state.
    pub fn toggle_lock(&mut self) -> bool {
        self.set_locked(!self.locked);
        self.locked
    }

    /// Adopt probed source dimensions: they become the displayed size
    /// and, while locked, the reference ratio.
    pub fn set_source(&mut self, dims: Dimensions) {
        self.source = Some(dims);
        if self.locked {
            if let Some(ratio) = dims.aspect() {
                self.reference_ratio = ratio;
            }
        }
        self.width = dims.width;
        self.height = dims.height;
    }

    /// Forget the probed source (probe failed or input cleared); while
    /// locked the reference ratio falls back to the 16:9 default.
    pub fn clear_source(&mut self) {
        self.source = None;
        if self.locked {
            self.reference_ratio = DEFAULT_ASPECT_RATIO;
        }
    }

    /// Restore the probed source size when known, else the construction
    /// defaults. While locked the reference ratio is recomputed from
    /// whatever was restored.
    pub fn reset(&mut self) {
        let dims = self.source.unwrap_or(self.fallback);
        self.width = dims.width;
        self.height = dims.height;
        if self.locked {
            if let Some(ratio) = dims.aspect() {
                self.reference_ratio = ratio;
            }
        }
    }

    /// Reduced ratio and decimal for display; `None` until both fields
    /// are positive.
    pub fn display_ratio(&self) -> Option<RatioDisplay> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let divisor = gcd(self.width, self.height);
        Some(RatioDisplay {
            reduced: (self.width / divisor, self.height / divisor),
            decimal: self.width as f64 / self.height as f64,
        })
    }

    /// Human-readable ratio line, matching the front-end label.
    pub fn describe(&self) -> Option<String> {
        let display = self.display_ratio()?;
        Some(match self.source {
            Some(src) => format!(
                "Aspect Ratio: Original {}x{} - {}:{}",
                src.width, src.height, display.reduced.0, display.reduced.1
            ),
            None => format!("Aspect Ratio: {}", display),
        })
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }
    a
}
