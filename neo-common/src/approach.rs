///! Close approach record

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::FormatError;
use crate::time::{self, format_approach_time, format_long_time, parse_approach_time};

/// One recorded passage of a NEO near Earth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseApproach {
    /// Designation of the approaching object (may not resolve to a known NEO)
    designation: String,

    /// Time of closest approach
    #[serde(serialize_with = "time::serialize_approach_time")]
    time: NaiveDateTime,

    /// Nominal approach distance in astronomical units
    distance: f64,

    /// Velocity relative to Earth in km/s
    velocity: f64,
}

impl CloseApproach {
    /// Create a new close approach, parsing `time` as `YYYY-MMM-DD HH:MM`.
    pub fn new(
        designation: impl Into<String>,
        time: &str,
        distance: f64,
        velocity: f64,
    ) -> Result<Self, FormatError> {
        Ok(Self::at(designation, parse_approach_time(time)?, distance, velocity))
    }

    /// Create a new close approach from an already parsed time.
    pub fn at(designation: impl Into<String>, time: NaiveDateTime, distance: f64, velocity: f64) -> Self {
        Self {
            designation: designation.into(),
            time,
            distance,
            velocity,
        }
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    /// Calendar date of the approach (time of day dropped)
    pub fn date(&self) -> NaiveDate {
        self.time.date()
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// e.g. "1969-Jul-29 22:56"
    pub fn time_str(&self) -> String {
        format_approach_time(&self.time)
    }

    /// e.g. "July 29, 1969 at 22:56"
    pub fn time_long_str(&self) -> String {
        format_long_time(&self.time)
    }

    /// Sentence describing this approach, naming the object as `who`.
    pub fn describe_as(&self, who: &str) -> String {
        format!(
            "On {}, '{}' approaches Earth at a distance of {:.2} au and a velocity of {:.2} km/s.",
            self.time_str(),
            who,
            self.distance,
            self.velocity
        )
    }
}

impl std::fmt::Display for CloseApproach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe_as(&self.designation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_parses_time() {
        let approach = CloseApproach::new("2015 CL", "1969-Jul-29 22:56", 0.3, 8.15).unwrap();
        assert_eq!(approach.designation(), "2015 CL");
        assert_eq!(approach.time_str(), "1969-Jul-29 22:56");
        assert_eq!(approach.date(), NaiveDate::from_ymd_opt(1969, 7, 29).unwrap());
        assert_eq!(approach.time_long_str(), "July 29, 1969 at 22:56");
    }

    #[test]
    fn test_new_rejects_bad_time() {
        let err = CloseApproach::new("2015 CL", "not-a-date", 0.3, 8.15).unwrap_err();
        assert!(matches!(err, FormatError::InvalidTimestamp { .. }));
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn test_display() {
        let approach = CloseApproach::new("2015 CL", "1900-Jan-01 00:00", 0.0921, 16.7523).unwrap();
        assert_eq!(
            approach.to_string(),
            "On 1900-Jan-01 00:00, '2015 CL' approaches Earth at a distance of 0.09 au and a velocity of 16.75 km/s."
        );
    }

    #[test]
    fn test_describe_as() {
        let approach = CloseApproach::new("433", "1900-Dec-27 01:30", 0.3149, 5.9904).unwrap();
        assert_eq!(
            approach.describe_as("Eros (433)"),
            "On 1900-Dec-27 01:30, 'Eros (433)' approaches Earth at a distance of 0.31 au and a velocity of 5.99 km/s."
        );
    }

    #[test]
    fn test_serialize_uses_display_time() {
        let approach = CloseApproach::new("433", "1900-Dec-27 01:30", 0.3149, 5.9904).unwrap();
        let json = serde_json::to_value(&approach).unwrap();
        assert_eq!(json["time"], "1900-Dec-27 01:30");
        assert_eq!(json["designation"], "433");
    }
}
