//! # Filter Errors

use thiserror::Error;

/// Result type for filter parsing
pub type FilterResult<T> = Result<T, FilterError>;

/// Rejected list criteria
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Query parameter is not a declared filter for the resource
    #[error("Unknown filter parameter: {0}")]
    UnknownParameter(String),

    /// Criterion value does not parse as the field's type
    #[error("Invalid value '{value}' for '{param}': expected {expected}")]
    InvalidValue {
        param: String,
        value: String,
        expected: &'static str,
    },

    /// Ordering names a field that is not orderable
    #[error("Invalid ordering field: {0}")]
    InvalidOrdering(String),

    /// Resource declares no search fields
    #[error("Search is not supported for this resource")]
    SearchUnsupported,
}
