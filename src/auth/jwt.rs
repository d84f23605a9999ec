//! # JWT Identity Tokens
//!
//! Bearer tokens carry the acting username in `sub`. Validation is
//! stateless: no user table is consulted.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};
use super::Actor;

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (username)
    pub sub: String,

    /// Issued at (Unix epoch seconds)
    pub iat: i64,

    /// Expiration (Unix epoch seconds)
    pub exp: i64,

    pub aud: String,

    pub iss: String,
}

/// JWT configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing secret
    #[serde(default = "default_secret")]
    pub secret: String,

    /// Lifetime of issued tokens
    #[serde(default = "default_ttl_minutes")]
    pub access_token_ttl_minutes: i64,

    #[serde(default = "default_issuer")]
    pub issuer: String,

    #[serde(default = "default_issuer")]
    pub audience: String,
}

fn default_secret() -> String {
    "CHANGE_THIS_SECRET_IN_PRODUCTION".to_string()
}

fn default_ttl_minutes() -> i64 {
    15
}

fn default_issuer() -> String {
    "restkit".to_string()
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            access_token_ttl_minutes: default_ttl_minutes(),
            issuer: default_issuer(),
            audience: default_issuer(),
        }
    }
}

/// Issues and validates identity tokens
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a token for `username`
    pub fn issue(&self, username: &str) -> AuthResult<String> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.config.access_token_ttl_minutes);

        let claims = JwtClaims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            aud: self.config.audience.clone(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)
    }

    /// Validate a token and extract its claims
    pub fn validate_token(&self, token: &str) -> AuthResult<JwtClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data =
            decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::MalformedToken,
                }
            })?;

        Ok(token_data.claims)
    }

    /// Resolve the acting user from an `Authorization` header value
    ///
    /// No header means anonymous; a header that fails validation is an error
    /// rather than a silent downgrade to anonymous.
    pub fn actor_from_header(&self, authorization: Option<&str>) -> AuthResult<Actor> {
        let Some(header) = authorization else {
            return Ok(Actor::Anonymous);
        };
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MalformedHeader)?;

        let claims = self.validate_token(token.trim())?;
        if claims.sub.trim().is_empty() {
            return Err(AuthError::MalformedToken);
        }
        Ok(Actor::User(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_manager() -> JwtManager {
        JwtManager::new(JwtConfig {
            secret: "test_secret_key_for_testing_only".to_string(),
            ..JwtConfig::default()
        })
    }

    #[test]
    fn test_issue_and_validate() {
        let manager = create_test_manager();

        let token = manager.issue("meera").unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "meera");
        assert_eq!(claims.iss, "restkit");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager1 = create_test_manager();
        let manager2 = JwtManager::new(JwtConfig {
            secret: "another_secret".to_string(),
            ..JwtConfig::default()
        });

        let token = manager1.issue("alice").unwrap();
        assert!(matches!(
            manager2.validate_token(&token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = JwtManager::new(JwtConfig {
            secret: "test_secret_key_for_testing_only".to_string(),
            access_token_ttl_minutes: -10,
            ..JwtConfig::default()
        });

        let token = manager.issue("alice").unwrap();
        assert!(matches!(
            manager.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_actor_from_header() {
        let manager = create_test_manager();
        let token = manager.issue("alice").unwrap();

        assert_eq!(manager.actor_from_header(None).unwrap(), Actor::Anonymous);
        assert_eq!(
            manager
                .actor_from_header(Some(&format!("Bearer {}", token)))
                .unwrap(),
            Actor::User("alice".to_string())
        );
        assert_eq!(
            manager.actor_from_header(Some("Basic abc")),
            Err(AuthError::MalformedHeader)
        );
        assert!(manager.actor_from_header(Some("Bearer not.a.token")).is_err());
    }
}
