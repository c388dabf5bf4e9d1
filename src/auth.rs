//! Session token minting and verification.
//!
//! Tokens are HMAC-SHA256-signed JWTs carrying `{exp, user_id}`. The
//! `jsonwebtoken` validator is pinned to `Algorithm::HS256`, which rejects any
//! token advertising a different algorithm (including `alg=none`) by
//! construction rather than by an extra runtime check.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};

use crate::errors::auth::AuthError;

pub const SESSION_COOKIE: &str = "yp_diploma_one_token";
const TOKEN_LIFETIME: TimeDelta = TimeDelta::hours(24);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    exp: i64,
    user_id: i32,
}

/// Mints and verifies session tokens against a single shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn mint(&self, user_id: i32) -> Result<String, AuthError> {
        let claims = Claims {
            exp: (Utc::now() + TOKEN_LIFETIME).timestamp(),
            user_id,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| AuthError::InvalidToken)
    }

    pub fn verify(&self, token: &str) -> Result<i32, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| AuthError::InvalidToken)?;

        if data.claims.user_id <= 0 {
            return Err(AuthError::InvalidToken);
        }

        Ok(data.claims.user_id)
    }
}

/// Extracted user identity for handlers behind the Authentication Gate.
#[derive(Debug, Clone, Copy)]
pub struct AuthedUser(pub i32);

impl FromRequest for AuthedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready((|| {
            let cookie = req.cookie(SESSION_COOKIE).ok_or(AuthError::MissingToken)?;

            let signer = req
                .app_data::<actix_web::web::Data<TokenSigner>>()
                .expect("TokenSigner must be registered as app data");

            let user_id = signer.verify(cookie.value())?;

            Ok(AuthedUser(user_id))
        })())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_token_verifies_with_the_same_secret() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.mint(42).unwrap();

        assert_eq!(signer.verify(&token).unwrap(), 42);
    }

    #[test]
    fn token_signed_with_a_different_secret_is_rejected() {
        let signer = TokenSigner::new("test-secret");
        let other = TokenSigner::new("different-secret");
        let token = signer.mint(7).unwrap();

        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            exp: (Utc::now() - TimeDelta::hours(1)).timestamp(),
            user_id: 1,
        };
        let secret = "test-secret";
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        let signer = TokenSigner::new(secret);
        assert!(signer.verify(&token).is_err());
    }

    #[test]
    fn zero_user_id_is_rejected() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.mint(0).unwrap();

        assert!(signer.verify(&token).is_err());
    }
}
