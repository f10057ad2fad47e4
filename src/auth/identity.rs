// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity resolution: verified token subject → [`Principal`].

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::roles;
use super::token::TokenCodec;
use crate::store::{StoreError, UserStore};

/// The resolved identity attached to one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Principal {
    /// Username (token subject)
    pub username: String,
    /// Role authorities, e.g. `ROLE_USER`
    pub roles: BTreeSet<String>,
}

impl Principal {
    pub fn new(username: impl Into<String>, roles: impl IntoIterator<Item = String>) -> Self {
        Self {
            username: username.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// Whether this principal holds `role` (unprefixed name, e.g. `ADMIN`).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(&roles::authority(role))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("user not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Maps usernames to principals through the user store.
#[derive(Clone)]
pub struct IdentityResolver {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenCodec>,
}

impl IdentityResolver {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenCodec>) -> Self {
        Self { users, tokens }
    }

    /// Look the user up and build a principal from its stored role.
    pub async fn resolve(&self, username: &str) -> Result<Principal, LookupError> {
        let record = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(LookupError::NotFound)?;

        Ok(Principal::new(record.username, [roles::authority(&record.role)]))
    }

    /// True iff the token verifies, its subject is exactly `expected_username`,
    /// and it has not expired.
    pub fn validate(&self, token: &str, expected_username: &str) -> bool {
        match self.tokens.verify(token) {
            Ok(claims) => claims.sub == expected_username && !self.tokens.is_expired(&claims),
            Err(_) => false,
        }
    }
}
