use thiserror::Error;

/// Errors raised by the summarizer before any computation starts.
///
/// A document that is too short to summarize is not an error; it is reported
/// as [`crate::Summary::TooShort`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SummarizeError {
    #[error("invalid configuration: `{field}` must be a non-negative integer, got {value}")]
    InvalidConfig { field: &'static str, value: i64 },

    #[error("invalid configuration: `{field}` must be a finite, non-negative number, got {value}")]
    InvalidWeight { field: &'static str, value: f64 },
}

/// Validate a caller supplied count (abstract size, keyword count).
///
/// ```
/// use precis_core::{checked_count, SummarizeError};
///
/// assert_eq!(checked_count("abstract_size", 3), Ok(3));
/// assert!(matches!(
///     checked_count("abstract_size", -1),
///     Err(SummarizeError::InvalidConfig { field: "abstract_size", value: -1 })
/// ));
/// ```
pub fn checked_count(field: &'static str, value: i64) -> Result<usize, SummarizeError> {
    usize::try_from(value).map_err(|_| SummarizeError::InvalidConfig { field, value })
}
