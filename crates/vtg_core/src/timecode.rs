//! Parsing of user-entered time strings.
//!
//! Bounds are typed free-form: plain seconds (`90`, `5.5`), `MM:SS`
//! (`02:03`) or `HH:MM:SS` (`01:02:03`). A blank field means "no bound".

use thiserror::Error;

/// A time string that does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid time format: {0}")]
pub struct TimeParseError(pub String);

/// Parse a time string into seconds.
///
/// Each colon-separated part is read as a decimal number; more than two
/// colons is an error carrying the offending input.
pub fn parse_time(text: &str) -> Result<f64, TimeParseError> {
    let parts: Vec<f64> = text
        .trim()
        .split(':')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| TimeParseError(text.to_string()))?;

    match parts.as_slice() {
        [secs] => Ok(*secs),
        [mins, secs] => Ok(mins * 60.0 + secs),
        [hours, mins, secs] => Ok(hours * 3600.0 + mins * 60.0 + secs),
        _ => Err(TimeParseError(text.to_string())),
    }
}

/// Parse an optional bound: blank input means "no bound".
pub fn parse_optional(text: &str) -> Result<Option<f64>, TimeParseError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_time(text).map(Some)
}
