// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password comparison capability.

use std::sync::OnceLock;

/// Plaintext behind [`decoy_hash`]; never a real credential.
const DECOY_PASSWORD: &str = "bearer-gate-decoy-password";

/// Compares a plaintext password against a stored hash.
///
/// Implementations must use a slow, salted hash. Calls are CPU-bound and
/// should be run off the async executor.
pub trait PasswordVerifier: Send + Sync {
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// bcrypt-backed verifier (`$2a$`, `$2b$`, `$2y$` hashes).
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptVerifier;

impl PasswordVerifier for BcryptVerifier {
    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        match bcrypt::verify(plaintext, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is not a valid bcrypt hash");
                false
            }
        }
    }
}

/// bcrypt hash checked when the username is unknown.
///
/// Makes a login for a missing user cost the same bcrypt work as a wrong
/// password for an existing one. Built on first use; CPU-bound, so call it
/// off the async executor.
pub fn decoy_hash() -> &'static str {
    static DECOY: OnceLock<String> = OnceLock::new();
    DECOY.get_or_init(|| match bcrypt::hash(DECOY_PASSWORD, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build decoy password hash");
            String::new()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bcrypt_accepts_correct_password() {
        let hash = bcrypt::hash("123", 4).unwrap();
        assert!(BcryptVerifier.verify("123", &hash));
    }

    #[test]
    fn bcrypt_rejects_wrong_password() {
        let hash = bcrypt::hash("123", 4).unwrap();
        assert!(!BcryptVerifier.verify("1234", &hash));
        assert!(!BcryptVerifier.verify("", &hash));
    }

    #[test]
    fn invalid_hash_never_matches() {
        assert!(!BcryptVerifier.verify("123", "plaintext-123"));
        assert!(!BcryptVerifier.verify("123", ""));
    }

    #[test]
    fn decoy_hash_is_a_real_bcrypt_hash() {
        let hash = decoy_hash();
        assert!(hash.starts_with("$2"));
        assert_eq!(decoy_hash(), hash);
        assert!(!BcryptVerifier.verify("123", hash));
    }
}
