//! Password hashing and bearer-token authentication
//!
//! Passwords are hashed with bcrypt at a fixed cost of 12. Tokens are
//! self-contained HS256 JWTs carrying the user id and username, valid for
//! exactly one hour from issuance.
//!
//! Protected routes take an [`AuthUser`] extractor argument. Every
//! verification failure (missing header, malformed value, bad signature,
//! expired token) collapses into the same undifferentiated 403.

use crate::core::error::ApiError;
use anyhow::{Context, Result};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed bcrypt work factor.
pub const BCRYPT_COST: u32 = 12;

/// Token lifetime in seconds (1 hour).
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Hash a plaintext password. One-way, salted, cost-factored.
pub fn hash_password(plain: &str) -> Result<String> {
    bcrypt::hash(plain, BCRYPT_COST).context("failed to hash password")
}

/// Check a plaintext password against a stored hash.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(plain, hash).context("failed to verify password")
}

/// Claims embedded in every issued token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub username: String,
    /// Expiry as a unix timestamp
    pub exp: i64,
}

/// Issues and verifies signed bearer tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Produce a signed token expiring [`TOKEN_TTL_SECS`] from now.
    pub fn issue(&self, user_id: Uuid, username: &str) -> Result<String> {
        let claims = Claims {
            sub: user_id,
            username: username.to_owned(),
            exp: Utc::now().timestamp() + TOKEN_TTL_SECS,
        };

        encode(&Header::default(), &claims, &self.encoding).context("failed to sign token")
    }

    /// Check signature and expiry.
    ///
    /// The reason for rejection is intentionally not surfaced.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::Forbidden)
    }
}

/// The authenticated caller, extracted from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    TokenSigner: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Forbidden)?;

        let token = header.strip_prefix("Bearer ").ok_or(ApiError::Forbidden)?;

        let claims = TokenSigner::from_ref(state).verify(token)?;

        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
        })
    }
}
