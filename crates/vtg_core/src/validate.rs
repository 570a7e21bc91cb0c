//! Validation of raw front-end fields into a [`ConversionRequest`].
//!
//! All fields arrive as strings, exactly as the user typed them, so the
//! user-facing messages live in one place regardless of which front-end
//! collected the values. Checks run in a fixed order and stop at the
//! first failure; nothing is launched until every check passes.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{ConversionRequest, CropBox, Dimensions, TimeRange};
use crate::timecode::{self, TimeParseError};

/// Raw field values as the front-end holds them.
#[derive(Debug, Clone, Default)]
pub struct RawParams {
    /// Source video path.
    pub input: String,
    /// Target GIF path.
    pub output: String,
    /// Output width field.
    pub width: String,
    /// Output height field.
    pub height: String,
    /// Frame-rate field.
    pub fps: String,
    /// Segment start field (blank = from the beginning).
    pub start_time: String,
    /// Segment stop field (blank = to the end).
    pub stop_time: String,
    /// Whether cropping is enabled.
    pub use_crop: bool,
    /// Crop width field.
    pub crop_width: String,
    /// Crop height field.
    pub crop_height: String,
    /// Crop horizontal offset field.
    pub crop_x: String,
    /// Crop vertical offset field.
    pub crop_y: String,
}

/// A validation failure. Each variant is a distinct user-facing message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please select an input video file")]
    MissingInput,
    #[error("Input video file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("Please specify an output GIF file")]
    MissingOutput,
    #[error("Width and height must be valid integers")]
    DimensionsNotInteger,
    #[error("Width and height must be positive integers")]
    DimensionsNotPositive,
    #[error("FPS must be a valid integer")]
    FrameRateNotInteger,
    #[error("FPS must be a positive integer")]
    FrameRateNotPositive,
    #[error(transparent)]
    Time(#[from] TimeParseError),
    #[error("Stop time must be after start time")]
    StopNotAfterStart,
    #[error("All crop fields must be filled when crop is enabled")]
    CropFieldsMissing,
    #[error("Crop values must be valid integers")]
    CropNotInteger,
    #[error("Crop width and height must be positive, offsets non-negative")]
    CropOutOfRange,
}

/// Validate raw fields and build the immutable request.
///
/// Check order: input path, output path, dimensions, frame rate, time
/// bounds, crop. The first failing check wins.
pub fn validate(raw: &RawParams) -> Result<ConversionRequest, ValidationError> {
    if raw.input.is_empty() {
        return Err(ValidationError::MissingInput);
    }
    let input = Path::new(&raw.input);
    if !input.exists() {
        return Err(ValidationError::InputNotFound(input.to_path_buf()));
    }

    if raw.output.is_empty() {
        return Err(ValidationError::MissingOutput);
    }

    let width = parse_int(&raw.width).ok_or(ValidationError::DimensionsNotInteger)?;
    let height = parse_int(&raw.height).ok_or(ValidationError::DimensionsNotInteger)?;
    if width <= 0 || height <= 0 {
        return Err(ValidationError::DimensionsNotPositive);
    }
    let dimensions = Dimensions::new(
        to_u32(width).ok_or(ValidationError::DimensionsNotInteger)?,
        to_u32(height).ok_or(ValidationError::DimensionsNotInteger)?,
    );

    let fps = parse_int(&raw.fps).ok_or(ValidationError::FrameRateNotInteger)?;
    if fps <= 0 {
        return Err(ValidationError::FrameRateNotPositive);
    }
    let frame_rate = to_u32(fps).ok_or(ValidationError::FrameRateNotInteger)?;

    let start = timecode::parse_optional(&raw.start_time)?;
    let stop = timecode::parse_optional(&raw.stop_time)?;
    if let (Some(start), Some(stop)) = (start, stop) {
        if stop <= start {
            return Err(ValidationError::StopNotAfterStart);
        }
    }

    let crop = if raw.use_crop {
        Some(validate_crop(raw)?)
    } else {
        None
    };

    Ok(ConversionRequest {
        input: input.to_path_buf(),
        output: PathBuf::from(&raw.output),
        dimensions,
        frame_rate,
        crop,
        range: TimeRange { start, stop },
    })
}

fn validate_crop(raw: &RawParams) -> Result<CropBox, ValidationError> {
    let fields = [&raw.crop_width, &raw.crop_height, &raw.crop_x, &raw.crop_y];
    if fields.iter().any(|field| field.is_empty()) {
        return Err(ValidationError::CropFieldsMissing);
    }

    let mut values = [0i64; 4];
    for (slot, field) in values.iter_mut().zip(fields) {
        *slot = parse_int(field).ok_or(ValidationError::CropNotInteger)?;
    }
    let [w, h, x, y] = values;
    if w <= 0 || h <= 0 || x < 0 || y < 0 {
        return Err(ValidationError::CropOutOfRange);
    }

    Ok(CropBox::new(
        to_u32(w).ok_or(ValidationError::CropNotInteger)?,
        to_u32(h).ok_or(ValidationError::CropNotInteger)?,
        to_u32(x).ok_or(ValidationError::CropNotInteger)?,
        to_u32(y).ok_or(ValidationError::CropNotInteger)?,
    ))
}

fn parse_int(field: &str) -> Option<i64> {
    field.trim().parse::<i64>().ok()
}

fn to_u32(value: i64) -> Option<u32> {
    u32::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Raw params that pass every check, with the input living in `dir`.
    fn valid_params(dir: &TempDir) -> RawParams {
        let input = dir.path().join("input.mp4");
        fs::write(&input, b"stub").unwrap();
        RawParams {
            input: input.to_string_lossy().into_owned(),
            output: "out.gif".to_string(),
            width: "420".to_string(),
            height: "333".to_string(),
            fps: "24".to_string(),
            ..RawParams::default()
        }
    }

    #[test]
    fn valid_params_build_a_request() {
        let dir = tempfile::tempdir().unwrap();
        let raw = valid_params(&dir);
        let request = validate(&raw).unwrap();
        assert_eq!(request.dimensions, Dimensions::new(420, 333));
        assert_eq!(request.frame_rate, 24);
        assert_eq!(request.crop, None);
        assert!(request.range.is_unbounded());
    }

    #[test]
    fn missing_input_wins_over_everything() {
        let raw = RawParams {
            width: "bogus".to_string(),
            ..RawParams::default()
        };
        assert_eq!(validate(&raw).unwrap_err(), ValidationError::MissingInput);
    }

    #[test]
    fn nonexistent_input_is_reported() {
        let raw = RawParams {
            input: "/no/such/file.mp4".to_string(),
            output: "out.gif".to_string(),
            ..RawParams::default()
        };
        assert!(matches!(
            validate(&raw).unwrap_err(),
            ValidationError::InputNotFound(_)
        ));
    }

    #[test]
    fn output_is_required() {
        let dir = tempfile::tempdir().unwrap();
        let mut raw = valid_params(&dir);
        raw.output.clear();
        assert_eq!(validate(&raw).unwrap_err(), ValidationError::MissingOutput);
    }

    #[test]
    fn dimension_checks() {
        let dir = tempfile::tempdir().unwrap();

        let mut raw = valid_params(&dir);
        raw.width = "abc".to_string();
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::DimensionsNotInteger
        );

        let mut raw = valid_params(&dir);
        raw.height = "5.5".to_string();
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::DimensionsNotInteger
        );

        let mut raw = valid_params(&dir);
        raw.width = "0".to_string();
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::DimensionsNotPositive
        );

        let mut raw = valid_params(&dir);
        raw.height = "-2".to_string();
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::DimensionsNotPositive
        );
    }

    #[test]
    fn frame_rate_checks() {
        let dir = tempfile::tempdir().unwrap();

        let mut raw = valid_params(&dir);
        raw.fps = "fast".to_string();
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::FrameRateNotInteger
        );

        let mut raw = valid_params(&dir);
        raw.fps = "0".to_string();
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::FrameRateNotPositive
        );
    }

    #[test]
    fn bad_time_strings_surface_the_offending_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut raw = valid_params(&dir);
        raw.start_time = "1:2:3:4".to_string();
        let err = validate(&raw).unwrap_err();
        assert!(err.to_string().contains("1:2:3:4"));
    }

    #[test]
    fn stop_must_be_after_start() {
        let dir = tempfile::tempdir().unwrap();

        let mut raw = valid_params(&dir);
        raw.start_time = "10".to_string();
        raw.stop_time = "5".to_string();
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::StopNotAfterStart
        );

        // Equal bounds are rejected too.
        let mut raw = valid_params(&dir);
        raw.start_time = "00:10".to_string();
        raw.stop_time = "10".to_string();
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::StopNotAfterStart
        );
    }

    #[test]
    fn single_bound_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let mut raw = valid_params(&dir);
        raw.stop_time = "01:00".to_string();
        let request = validate(&raw).unwrap();
        assert_eq!(request.range.start, None);
        assert_eq!(request.range.stop, Some(60.0));
    }

    #[test]
    fn crop_checks() {
        let dir = tempfile::tempdir().unwrap();

        let mut raw = valid_params(&dir);
        raw.use_crop = true;
        raw.crop_width = "100".to_string();
        assert_eq!(
            validate(&raw).unwrap_err(),
            ValidationError::CropFieldsMissing
        );

        let mut raw = valid_params(&dir);
        raw.use_crop = true;
        raw.crop_width = "100".to_string();
        raw.crop_height = "abc".to_string();
        raw.crop_x = "0".to_string();
        raw.crop_y = "0".to_string();
        assert_eq!(validate(&raw).unwrap_err(), ValidationError::CropNotInteger);

        let mut raw = valid_params(&dir);
        raw.use_crop = true;
        raw.crop_width = "100".to_string();
        raw.crop_height = "100".to_string();
        raw.crop_x = "-1".to_string();
        raw.crop_y = "0".to_string();
        assert_eq!(validate(&raw).unwrap_err(), ValidationError::CropOutOfRange);

        let mut raw = valid_params(&dir);
        raw.use_crop = true;
        raw.crop_width = "0".to_string();
        raw.crop_height = "100".to_string();
        raw.crop_x = "0".to_string();
        raw.crop_y = "0".to_string();
        assert_eq!(validate(&raw).unwrap_err(), ValidationError::CropOutOfRange);
    }

    #[test]
    fn crop_fields_are_ignored_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut raw = valid_params(&dir);
        raw.crop_width = "garbage".to_string();
        let request = validate(&raw).unwrap();
        assert_eq!(request.crop, None);
    }

    #[test]
    fn valid_crop_is_carried_into_the_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut raw = valid_params(&dir);
        raw.use_crop = true;
        raw.crop_width = "640".to_string();
        raw.crop_height = "360".to_string();
        raw.crop_x = "10".to_string();
        raw.crop_y = "20".to_string();
        let request = validate(&raw).unwrap();
        assert_eq!(request.crop, Some(CropBox::new(640, 360, 10, 20)));
    }
}
