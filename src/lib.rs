// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer Gate - Stateless Token Authentication & Role Authorization
//!
//! Every request passes through an authentication layer that turns an
//! `Authorization: Bearer <token>` header into a per-request principal, and
//! an authorization layer that checks the principal against an ordered
//! table of path rules before any handler runs.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Token codec, identity resolution, policy, middleware
//! - `config` - Environment-driven server configuration
//! - `store` - User record lookup

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_support;
