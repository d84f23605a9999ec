//! # Store Errors

use thiserror::Error;

use crate::serializer::ValidationErrors;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} '{key}' already exists")]
    DuplicateKey { entity: &'static str, key: String },

    /// Write rejected by field or relation checks
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A writer panicked while holding the store lock
    #[error("Store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        StoreError::Validation(errors)
    }
}
