// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity resolution failures.
//!
//! Every variant here is recovered inside the authentication middleware and
//! turned into "no principal". None of them is ever rendered to the caller;
//! the only user-visible outcomes are the policy's 401/403 payloads.

use super::identity::LookupError;
use super::token::TokenError;

/// Why a bearer token did not produce a principal.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Token could not be decoded
    #[error("token is malformed")]
    TokenMalformed,
    /// Token signature is invalid
    #[error("token signature is invalid")]
    TokenBadSignature,
    /// Token has expired
    #[error("token has expired")]
    TokenExpired,
    /// Token subject has no account
    #[error("identity not found")]
    IdentityNotFound,
    /// Stored username differs from the token subject
    #[error("token subject does not match the resolved identity")]
    SubjectMismatch,
    /// User store lookup failed
    #[error("identity store unavailable: {0}")]
    IdentityStoreUnavailable(String),
}

impl AuthError {
    /// Stable identifier used as a log field.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::TokenMalformed => "token_malformed",
            AuthError::TokenBadSignature => "token_bad_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::IdentityNotFound => "identity_not_found",
            AuthError::SubjectMismatch => "subject_mismatch",
            AuthError::IdentityStoreUnavailable(_) => "identity_store_unavailable",
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::BadSignature => AuthError::TokenBadSignature,
            _ => AuthError::TokenMalformed,
        }
    }
}

impl From<LookupError> for AuthError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound => AuthError::IdentityNotFound,
            LookupError::Store(e) => AuthError::IdentityStoreUnavailable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn token_errors_map_to_kinds() {
        assert_eq!(
            AuthError::from(TokenError::BadSignature).error_code(),
            "token_bad_signature"
        );
        assert_eq!(AuthError::from(TokenError::Malformed).error_code(), "token_malformed");
    }

    #[test]
    fn lookup_errors_map_to_kinds() {
        assert_eq!(
            AuthError::from(LookupError::NotFound).error_code(),
            "identity_not_found"
        );
        let store = LookupError::Store(StoreError::Unavailable("timeout".to_string()));
        let err = AuthError::from(store);
        assert_eq!(err.error_code(), "identity_store_unavailable");
        assert!(err.to_string().contains("timeout"));
    }
}
