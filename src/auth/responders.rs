// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Structured 401/403 failure responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message returned with every 401.
pub const UNAUTHENTICATED_MESSAGE: &str = "unauthenticated";

/// Reason returned with 403s produced by the access policy.
pub const ACCESS_DENIED_MESSAGE: &str = "access denied";

/// Error body for rejected requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorPayload {
    pub success: bool,
    pub code: u16,
    pub message: String,
    /// Request path that was rejected
    pub path: String,
}

/// 401 payload for a request with no resolved identity.
pub fn on_unauthenticated(path: &str) -> ErrorPayload {
    ErrorPayload {
        success: false,
        code: StatusCode::UNAUTHORIZED.as_u16(),
        message: UNAUTHENTICATED_MESSAGE.to_string(),
        path: path.to_string(),
    }
}

/// 403 payload for an identity lacking the required role.
pub fn on_forbidden(path: &str, reason: &str) -> ErrorPayload {
    ErrorPayload {
        success: false,
        code: StatusCode::FORBIDDEN.as_u16(),
        message: reason.to_string(),
        path: path.to_string(),
    }
}

impl IntoResponse for ErrorPayload {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
