// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{models::MessageResponse, state::AppState};

/// Liveness response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Number of rules in the loaded access policy.
    pub access_rules: usize,
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        access_rules: state.policy.rules().len(),
    })
}

/// Public greeting.
#[utoipa::path(
    get,
    path = "/hello",
    tag = "Health",
    responses(
        (status = 200, description = "Greeting", body = MessageResponse)
    )
)]
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello!"))
}
