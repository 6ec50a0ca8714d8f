///! Approach time codec
///!
///! Close-approach timestamps arrive as `YYYY-MMM-DD HH:MM` (e.g. `1900-Jan-01 00:00`)
///! and are rendered back in the same convention.

use chrono::NaiveDateTime;
use serde::Serializer;

use crate::error::FormatError;

/// Canonical approach time format
pub const APPROACH_TIME_FORMAT: &str = "%Y-%b-%d %H:%M";

/// Human-readable format with the month spelled out
const LONG_TIME_FORMAT: &str = "%B %-d, %Y at %H:%M";

/// Parse an approach timestamp such as `1969-Jul-29 22:56`.
pub fn parse_approach_time(text: &str) -> Result<NaiveDateTime, FormatError> {
    NaiveDateTime::parse_from_str(text.trim(), APPROACH_TIME_FORMAT).map_err(|_| {
        FormatError::InvalidTimestamp {
            input: text.to_string(),
        }
    })
}

/// Render a timestamp as `YYYY-MMM-DD HH:MM`.
pub fn format_approach_time(time: &NaiveDateTime) -> String {
    time.format(APPROACH_TIME_FORMAT).to_string()
}

/// Render a timestamp as e.g. `July 29, 1969 at 22:56`.
pub fn format_long_time(time: &NaiveDateTime) -> String {
    time.format(LONG_TIME_FORMAT).to_string()
}

pub(crate) fn serialize_approach_time<S>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_approach_time(time))
}
