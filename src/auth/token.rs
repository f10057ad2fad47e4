// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed token issuance and verification.
//!
//! Tokens are compact HS256 JWTs carrying `sub`, `iat` and `exp`. Signature
//! verification and expiry checking are separate operations:
//! [`TokenCodec::verify`] only proves the claims were minted with our key,
//! [`TokenCodec::is_expired`] decides whether they are still current.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Minimum HMAC key length in bytes (256 bits).
pub const MIN_SECRET_LEN: usize = 32;

/// Default token lifetime (1 hour).
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Token codec errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Token could not be decoded into the expected structure.
    #[error("token is malformed")]
    Malformed,

    /// Signature does not match the claims.
    #[error("token signature is invalid")]
    BadSignature,

    /// Signing key is too short to be used.
    #[error("signing key must be at least {min} bytes, got {0}", min = MIN_SECRET_LEN)]
    WeakKey(usize),

    /// TTL cannot be represented as a timestamp offset.
    #[error("token ttl is out of range")]
    InvalidTtl,

    /// Internal signing failure.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Claims carried inside every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Issues and verifies signed tokens with a single symmetric key.
///
/// Holds only immutable key material, so one instance is shared by every
/// in-flight request behind an `Arc`.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl TokenCodec {
    /// Create a codec from a raw secret and a fixed token lifetime.
    ///
    /// # Errors
    /// Returns `TokenError::WeakKey` for secrets shorter than [`MIN_SECRET_LEN`].
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenError::WeakKey(secret.len()));
        }
        let ttl = TimeDelta::from_std(ttl).map_err(|_| TokenError::InvalidTtl)?;

        // Expiry is checked separately by `is_expired`.
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Issue a token for `subject`, valid from now for the configured TTL.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify the token signature and decode its claims.
    ///
    /// The HMAC comparison is constant-time. Expiry is *not* checked here.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })
    }

    /// Whether `claims.exp` is strictly before the current time.
    pub fn is_expired(&self, claims: &Claims) -> bool {
        Self::is_expired_at(claims, Utc::now())
    }

    pub fn is_expired_at(claims: &Claims, now: DateTime<Utc>) -> bool {
        claims.exp < now.timestamp()
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}
