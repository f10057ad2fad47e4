// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User store capability and its in-memory implementation.
//!
//! The gateway only ever asks one question of persistent storage:
//! "who is `username`?". Any backend (relational, remote directory, file)
//! plugs in by implementing [`UserStore`].

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    /// Salted slow hash (bcrypt); never leaves the server.
    pub password_hash: String,
    /// Single role name, with or without the `ROLE_` prefix.
    pub role: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user store unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read user file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid user file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate user in user file: {0}")]
    DuplicateUser(String),
}

/// Identity store lookup.
///
/// Lookups may block on I/O and may fail; callers must not cache results.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by exact (case-sensitive) username.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;
}

/// Read-only user table held in memory.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: HashMap<String, UserRecord>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records, rejecting duplicate usernames.
    pub fn from_records(records: Vec<UserRecord>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for record in records {
            if store.users.contains_key(&record.username) {
                return Err(StoreError::DuplicateUser(record.username));
            }
            store.insert(record);
        }
        Ok(store)
    }

    /// Load a JSON array of [`UserRecord`]s.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path)?;
        let records: Vec<UserRecord> = serde_json::from_str(&raw)?;
        Self::from_records(records)
    }

    pub fn insert(&mut self, record: UserRecord) {
        self.users.insert(record.username.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.get(username).cloned())
    }
}
