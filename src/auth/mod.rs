//! # Acting-user identity
//!
//! Identity is supplied from outside: a bearer token names the user making
//! the request. Records that belong to a user (tweets) are stamped with it.

pub mod errors;
pub mod jwt;

pub use errors::{AuthError, AuthResult};
pub use jwt::{JwtClaims, JwtConfig, JwtManager};

/// The user on whose behalf a request runs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Actor {
    #[default]
    Anonymous,
    User(String),
}

impl Actor {
    pub fn user(name: impl Into<String>) -> Self {
        Actor::User(name.into())
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Actor::Anonymous => None,
            Actor::User(name) => Some(name),
        }
    }

    /// The username, or `AuthenticationRequired` for anonymous callers
    pub fn require(&self) -> AuthResult<&str> {
        self.username().ok_or(AuthError::AuthenticationRequired)
    }
}
