// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization middleware for Axum.
//!
//! Two layers run in front of every route:
//!
//! 1. [`authenticate`] tries to turn an `Authorization: Bearer <token>`
//!    header into a [`Principal`] stored in the request's [`RequestContext`].
//!    It never rejects a request; a missing principal is the signal.
//! 2. [`authorize`] evaluates the [`AccessPolicy`](super::AccessPolicy)
//!    against that context and short-circuits denied requests with a
//!    401/403 payload before any handler runs.
//!
//! ```rust,ignore
//! let app = auth::middleware::gate(Router::new().route("/x", get(handler)), state);
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};

use super::context::RequestContext;
use super::error::AuthError;
use super::identity::Principal;
use super::policy::{Decision, Denial};
use super::responders::{on_forbidden, on_unauthenticated, ErrorPayload, ACCESS_DENIED_MESSAGE};
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Wrap a router with the authentication and authorization layers.
///
/// Layers added later run first, so authentication is added last.
pub fn gate(router: Router, state: AppState) -> Router {
    router
        .layer(middleware::from_fn_with_state(state.clone(), authorize))
        .layer(middleware::from_fn_with_state(state, authenticate))
}

/// Authentication middleware function.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut ctx = request
        .extensions_mut()
        .remove::<RequestContext>()
        .unwrap_or_default();

    authenticate_request(&state, request.headers(), &mut ctx).await;

    request.extensions_mut().insert(ctx);
    next.run(request).await
}

/// Resolve the bearer token in `headers` into `ctx`, swallowing every failure.
///
/// Does nothing if `ctx` already holds a principal.
pub async fn authenticate_request(
    state: &AppState,
    headers: &HeaderMap,
    ctx: &mut RequestContext,
) {
    if ctx.is_authenticated() {
        return;
    }
    let Some(token) = bearer_token(headers) else {
        return;
    };

    match resolve_principal(state, token).await {
        Ok(principal) => {
            tracing::debug!(username = %principal.username, "Request authenticated");
            ctx.attach(principal);
        }
        Err(e @ AuthError::IdentityStoreUnavailable(_)) => {
            tracing::warn!(error_code = e.error_code(), error = %e, "Identity lookup failed");
        }
        Err(e) => {
            tracing::debug!(error_code = e.error_code(), "Bearer token rejected");
        }
    }
}

async fn resolve_principal(state: &AppState, token: &str) -> Result<Principal, AuthError> {
    let claims = state.tokens.verify(token)?;
    if state.tokens.is_expired(&claims) {
        return Err(AuthError::TokenExpired);
    }

    let principal = state.identities.resolve(&claims.sub).await?;
    if !state.identities.validate(token, &principal.username) {
        return Err(AuthError::SubjectMismatch);
    }
    Ok(principal)
}

/// Token from an `Authorization: Bearer <token>` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)?
        .trim();
    (!token.is_empty()).then_some(token)
}

/// Authorization middleware function.
pub async fn authorize(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let decision = match request.extensions().get::<RequestContext>() {
        Some(ctx) => state.policy.evaluate(&path, ctx),
        None => state.policy.evaluate(&path, &RequestContext::new()),
    };

    match decision {
        Decision::Allowed => next.run(request).await,
        Decision::Denied(denial) => deny(&path, &denial).into_response(),
    }
}

/// Failure payload for a denied request.
pub fn deny(path: &str, denial: &Denial) -> ErrorPayload {
    match denial {
        Denial::Unauthenticated => {
            tracing::info!(path, "Rejected unauthenticated request");
            on_unauthenticated(path)
        }
        Denial::Forbidden { role } => {
            tracing::info!(path, required_role = %role, "Rejected request lacking role");
            on_forbidden(path, ACCESS_DENIED_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{TokenCodec, DEFAULT_TOKEN_TTL};
    use crate::store::{InMemoryUserStore, StoreError, UserRecord, UserStore};
    use crate::test_support;
    use async_trait::async_trait;
    use axum::http::HeaderValue;
    use chrono::{TimeDelta, Utc};
    use std::sync::Arc;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn bearer(token: &str) -> HeaderMap {
        headers(&format!("Bearer {token}"))
    }

    async fn run(state: &AppState, headers: &HeaderMap) -> RequestContext {
        let mut ctx = RequestContext::new();
        authenticate_request(state, headers, &mut ctx).await;
        ctx
    }

    /// Store that matches usernames case-insensitively, returning the stored spelling.
    struct CaseInsensitiveStore(InMemoryUserStore);

    #[async_trait]
    impl UserStore for CaseInsensitiveStore {
        async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
            self.0.find_by_username(&username.to_lowercase()).await
        }
    }

    struct DownStore;

    #[async_trait]
    impl UserStore for DownStore {
        async fn find_by_username(&self, _username: &str) -> Result<Option<UserRecord>, StoreError> {
            Err(StoreError::Unavailable("database is down".to_string()))
        }
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("Bearer  abc ")), Some("abc"));
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("bearer abc")), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("abc.def.ghi")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn valid_token_attaches_principal() {
        let state = test_support::state();
        let token = state.tokens.issue("alice").unwrap();

        let ctx = run(&state, &bearer(&token)).await;
        let principal = ctx.principal().unwrap();
        assert_eq!(principal.username, "alice");
        assert!(principal.has_role("USER"));
    }

    #[tokio::test]
    async fn missing_header_attaches_nothing() {
        let state = test_support::state();
        assert!(!run(&state, &HeaderMap::new()).await.is_authenticated());
    }

    #[tokio::test]
    async fn missing_bearer_prefix_attaches_nothing() {
        let state = test_support::state();
        let token = state.tokens.issue("alice").unwrap();
        assert!(!run(&state, &headers(&token)).await.is_authenticated());
        assert!(!run(&state, &headers(&format!("Token {token}"))).await.is_authenticated());
    }

    #[tokio::test]
    async fn bad_signature_attaches_nothing() {
        let state = test_support::state();
        let forger = TokenCodec::new(b"an-attacker-controlled-secret-key-000000", DEFAULT_TOKEN_TTL);
        let token = forger.unwrap().issue("root").unwrap();
        assert!(!run(&state, &bearer(&token)).await.is_authenticated());
    }

    #[tokio::test]
    async fn malformed_token_attaches_nothing() {
        let state = test_support::state();
        assert!(!run(&state, &bearer("not.a.jwt")).await.is_authenticated());
    }

    #[tokio::test]
    async fn expired_token_attaches_nothing() {
        let state = test_support::state();
        let issued = Utc::now() - TimeDelta::hours(2);
        let token = state.tokens.issue_at("alice", issued).unwrap();
        assert!(!run(&state, &bearer(&token)).await.is_authenticated());
    }

    #[tokio::test]
    async fn unknown_user_attaches_nothing() {
        let state = test_support::state();
        let token = state.tokens.issue("mallory").unwrap();
        assert!(!run(&state, &bearer(&token)).await.is_authenticated());
    }

    #[tokio::test]
    async fn subject_mismatch_attaches_nothing() {
        let store = InMemoryUserStore::from_records(vec![test_support::user("alice", "USER")]);
        let users: Arc<dyn UserStore> = Arc::new(CaseInsensitiveStore(store.unwrap()));
        let state = AppState::new(
            test_support::codec(),
            users,
            Default::default(),
        );

        // Exact spelling still works.
        let token = state.tokens.issue("alice").unwrap();
        assert!(run(&state, &bearer(&token)).await.is_authenticated());

        // The store resolves "ALICE" to "alice", which is not the token subject.
        let token = state.tokens.issue("ALICE").unwrap();
        assert!(!run(&state, &bearer(&token)).await.is_authenticated());
    }

    #[tokio::test]
    async fn store_failure_attaches_nothing() {
        let state = AppState::new(
            test_support::codec(),
            Arc::new(DownStore),
            Default::default(),
        );
        let token = state.tokens.issue("alice").unwrap();
        assert!(!run(&state, &bearer(&token)).await.is_authenticated());
    }

    #[tokio::test]
    async fn running_twice_keeps_first_principal() {
        let state = test_support::state();
        let alice = state.tokens.issue("alice").unwrap();
        let root = state.tokens.issue("root").unwrap();

        let mut ctx = RequestContext::new();
        authenticate_request(&state, &bearer(&alice), &mut ctx).await;
        authenticate_request(&state, &bearer(&alice), &mut ctx).await;
        authenticate_request(&state, &bearer(&root), &mut ctx).await;

        let principal = ctx.principal().unwrap();
        assert_eq!(principal.username, "alice");
        assert!(!principal.has_role("ADMIN"));
    }

    #[test]
    fn deny_maps_denials_to_payloads() {
        let unauthenticated = deny("/api/admin/hello", &Denial::Unauthenticated);
        assert_eq!(unauthenticated.code, 401);

        let forbidden = deny(
            "/api/admin/hello",
            &Denial::Forbidden {
                role: "ADMIN".to_string(),
            },
        );
        assert_eq!(forbidden.code, 403);
        assert_eq!(forbidden.message, ACCESS_DENIED_MESSAGE);
        assert!(!forbidden.message.contains("ADMIN"));
    }
}
