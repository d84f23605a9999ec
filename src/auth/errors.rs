//! # Auth Errors

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Identity errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Authorization header present but not a bearer token
    #[error("Malformed authorization header")]
    MalformedHeader,

    /// JWT token is malformed
    #[error("Malformed token")]
    MalformedToken,

    /// JWT token has expired
    #[error("Token expired")]
    TokenExpired,

    /// JWT signature is invalid
    #[error("Invalid token signature")]
    InvalidSignature,

    /// The operation needs an acting user
    #[error("Authentication credentials were not provided")]
    AuthenticationRequired,

    /// Token generation failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MalformedHeader
            | AuthError::MalformedToken
            | AuthError::TokenExpired
            | AuthError::InvalidSignature
            | AuthError::AuthenticationRequired => 401,
            AuthError::TokenGenerationFailed => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::TokenExpired.status_code(), 401);
        assert_eq!(AuthError::AuthenticationRequired.status_code(), 401);
        assert_eq!(AuthError::TokenGenerationFailed.status_code(), 500);
        assert!(!AuthError::TokenGenerationFailed.is_client_error());
    }
}
