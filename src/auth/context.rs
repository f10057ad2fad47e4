// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request identity carrier and the Axum extractors that read it.
//!
//! The [`RequestContext`] lives in the request's own extensions. It is
//! created by the authentication middleware and dropped with the request;
//! nothing about the current caller is ever stored outside it.
//!
//! Handlers behind the gateway use the extractors:
//!
//! ```rust,ignore
//! async fn my_handler(CurrentUser(principal): CurrentUser) -> impl IntoResponse {
//!     // principal.username, principal.roles
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::identity::Principal;
use super::responders::{on_unauthenticated, ErrorPayload};

/// Holds at most one [`Principal`] for the lifetime of a single request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    principal: Option<Principal>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a principal. The first attachment wins; later calls are ignored.
    ///
    /// Returns `true` if this call attached the principal.
    pub fn attach(&mut self, principal: Principal) -> bool {
        if self.principal.is_some() {
            return false;
        }
        self.principal = Some(principal);
        true
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}

/// Extractor requiring an authenticated principal.
///
/// The authorization layer has already rejected anonymous callers on
/// protected routes; this rejects again if a handler is mounted on a route
/// the policy left public.
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ErrorPayload;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(|ctx| ctx.principal().cloned())
            .map(CurrentUser)
            .ok_or_else(|| on_unauthenticated(parts.uri.path()))
    }
}

/// Optional authentication extractor.
///
/// Returns `None` when no identity was resolved, instead of rejecting.
pub struct MaybeUser(pub Option<Principal>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<RequestContext>()
            .and_then(|ctx| ctx.principal().cloned());
        Ok(MaybeUser(principal))
    }
}
