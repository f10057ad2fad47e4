// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::auth::{AccessPolicy, TokenCodec, DEFAULT_TOKEN_TTL};
use crate::state::AppState;
use crate::store::{InMemoryUserStore, UserRecord};

pub const TEST_SECRET: &[u8] = b"unit-test-signing-secret-0123456789abcdef";

/// Lowest bcrypt cost, keeps hashing fast in tests.
const TEST_BCRYPT_COST: u32 = 4;

pub fn codec() -> TokenCodec {
    TokenCodec::new(TEST_SECRET, DEFAULT_TOKEN_TTL).unwrap()
}

/// User whose password is `<username>-pw`.
pub fn user(username: &str, role: &str) -> UserRecord {
    UserRecord {
        username: username.to_string(),
        password_hash: bcrypt::hash(format!("{username}-pw"), TEST_BCRYPT_COST).unwrap(),
        role: role.to_string(),
    }
}

/// State with `alice` and `bob` (USER), `root` (ADMIN) and the default policy.
pub fn state() -> AppState {
    state_with_policy(AccessPolicy::default())
}

pub fn state_with_policy(policy: AccessPolicy) -> AppState {
    let store = InMemoryUserStore::from_records(vec![
        user("alice", "USER"),
        user("bob", "ROLE_USER"),
        user("root", "ADMIN"),
    ])
    .unwrap();
    AppState::new(codec(), Arc::new(store), policy)
}
