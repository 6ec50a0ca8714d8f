use thiserror::Error;

/// Raised when query criteria cannot be turned into filters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Invalid {field} '{value}': expected a date in YYYY-MM-DD format")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid {field} '{value}': expected a finite number")]
    InvalidNumber { field: &'static str, value: String },
}
