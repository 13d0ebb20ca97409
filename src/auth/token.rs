use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::config;

/// Bearer token claims. `sub` carries the username; protected routes
/// re-resolve it against the users table on every request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid authentication credentials")]
    Invalid,

    #[error("Token generation error: {0}")]
    Generation(String),
}

/// Issue an HS256 token for a username with the given time to live.
pub fn issue_token(username: &str, is_admin: bool, ttl: Duration) -> Result<String, TokenError> {
    let secret = &config().security.jwt_secret;
    if secret.is_empty() {
        return Err(TokenError::Generation(
            "JWT secret not configured".to_string(),
        ));
    }

    let now = Utc::now();
    let claims = Claims {
        sub: username.to_string(),
        is_admin,
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Generation(e.to_string()))
}

/// Decode and validate a bearer token. Tampered, expired or otherwise
/// unusable tokens all come back as `Invalid`; the caller turns that
/// into a 401.
pub fn verify_token(token: &str) -> Result<Claims, TokenError> {
    let secret = &config().security.jwt_secret;
    if secret.is_empty() {
        return Err(TokenError::Invalid);
    }

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_claims() {
        let token = issue_token("alice", true, Duration::minutes(30)).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token("alice", false, Duration::minutes(30)).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('x');
        assert!(verify_token(&tampered).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Past the default 60s validation leeway
        let token = issue_token("alice", false, Duration::minutes(-5)).unwrap();
        assert!(verify_token(&token).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: "alice".to_string(),
            is_admin: false,
            exp: (now + Duration::minutes(30)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"some-other-secret"),
        )
        .unwrap();
        assert!(verify_token(&token).is_err());
    }
}
