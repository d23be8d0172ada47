//! Signed identity tokens.
//!
//! The server mints an HS256 JWT at login embedding the non-secret user
//! fields, hands it to the browser inside an httpOnly cookie, and
//! re-verifies it on every protected request. Clients never read the
//! token; this module exists on the shared side so the claims shape and
//! the server agree by construction.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::types::{Role, UserInfo};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token")]
    Invalid,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Claims embedded in the identity token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthClaims {
    /// User identifier.
    pub sub: Uuid,
    pub role: Role,
    pub email: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl AuthClaims {
    /// Project the claims back into the client-safe user shape.
    pub fn user_info(&self) -> UserInfo {
        UserInfo {
            id: self.sub,
            user_name: self.user_name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Mint a signed token for `user`, valid for `ttl` from now.
pub fn issue(user: &UserInfo, secret: &str, ttl: Duration) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = AuthClaims {
        sub: user.id,
        role: user.role,
        email: user.email.clone(),
        user_name: user.user_name.clone(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify a token's signature and expiry, returning the embedded claims.
pub fn verify(token: &str, secret: &str) -> Result<AuthClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    jsonwebtoken::decode::<AuthClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserInfo {
        UserInfo {
            id: Uuid::new_v4(),
            user_name: "alice".into(),
            email: "a@x.com".into(),
            role: Role::Member,
        }
    }

    #[test]
    fn token_round_trips_identity() {
        let user = alice();
        let token = issue(&user, "secret", Duration::hours(24)).unwrap();

        let claims = verify(&token, "secret").unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.user_name, "alice");
        assert_eq!(claims.role, Role::Member);
        assert_eq!(claims.user_info(), user);
    }

    #[test]
    fn expired_token_is_rejected() {
        let user = alice();
        let token = issue(&user, "secret", Duration::seconds(-60)).unwrap();

        assert_eq!(verify(&token, "secret"), Err(TokenError::Expired));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let user = alice();
        let token = issue(&user, "secret", Duration::hours(1)).unwrap();

        assert_eq!(verify(&token, "other-secret"), Err(TokenError::Invalid));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(verify("not-a-token", "secret"), Err(TokenError::Invalid));
    }
}
