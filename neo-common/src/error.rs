use thiserror::Error;

/// Raised when a record field does not match its expected textual format.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid approach time '{input}': expected YYYY-MMM-DD HH:MM")]
    InvalidTimestamp { input: String },
}
