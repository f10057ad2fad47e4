// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AccessPolicy, BcryptVerifier, IdentityResolver, PasswordVerifier, TokenCodec};
use crate::store::UserStore;

/// Shared, read-only gateway state.
///
/// Built once at startup; every field is immutable behind an `Arc`, so
/// concurrent requests never contend on it.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenCodec>,
    pub identities: IdentityResolver,
    pub policy: Arc<AccessPolicy>,
    pub users: Arc<dyn UserStore>,
    pub passwords: Arc<dyn PasswordVerifier>,
}

impl AppState {
    pub fn new(tokens: TokenCodec, users: Arc<dyn UserStore>, policy: AccessPolicy) -> Self {
        let tokens = Arc::new(tokens);
        Self {
            identities: IdentityResolver::new(users.clone(), tokens.clone()),
            tokens,
            policy: Arc::new(policy),
            users,
            passwords: Arc::new(BcryptVerifier),
        }
    }

    /// Replace the password verifier.
    pub fn with_password_verifier(mut self, passwords: Arc<dyn PasswordVerifier>) -> Self {
        self.passwords = passwords;
        self
    }
}
