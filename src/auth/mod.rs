// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication & Authorization Module
//!
//! Stateless bearer-token authentication and route-level role authorization.
//!
//! ## Request Flow
//!
//! 1. Client logs in at `POST /api/auth/login` and receives a signed token
//! 2. Client sends `Authorization: Bearer <token>` on later requests
//! 3. Gateway:
//!    - Verifies the HS256 signature, then the expiry
//!    - Looks the subject up in the user store
//!    - Attaches the resulting principal to the request context
//! 4. The access policy matches the path against its ordered rule table
//!    and either lets the request through or answers 401/403
//!
//! ## Security
//!
//! - No server-side sessions; every request is verified from scratch
//! - Token failures are never reported individually to the caller
//! - Unmatched routes require authentication

pub mod context;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod responders;
pub mod roles;
pub mod token;

pub use context::{CurrentUser, MaybeUser, RequestContext};
pub use error::AuthError;
pub use identity::{IdentityResolver, LookupError, Principal};
pub use password::{decoy_hash, BcryptVerifier, PasswordVerifier};
pub use policy::{AccessPolicy, AccessRule, Decision, Denial, PolicyError, Requirement};
pub use responders::{on_forbidden, on_unauthenticated, ErrorPayload};
pub use token::{Claims, TokenCodec, TokenError, DEFAULT_TOKEN_TTL};
