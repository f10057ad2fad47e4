// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoint.

use axum::{extract::State, Json};

use crate::{
    auth::decoy_hash,
    error::ApiError,
    models::{LoginRequest, LoginResponse},
    state::AppState,
};

/// Returned for unknown users and wrong passwords alike.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid username or password";

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized(INVALID_CREDENTIALS_MESSAGE)
}

/// Exchange a username and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 401, description = "Invalid username or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let record = state
        .users
        .find_by_username(&request.username)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "User lookup failed during login");
            ApiError::internal("identity store unavailable")
        })?;

    // Unknown users are checked against a decoy hash so both failures cost
    // the same bcrypt work.
    let passwords = state.passwords.clone();
    let hash = record.as_ref().map(|record| record.password_hash.clone());
    let password = request.password;
    let matches = tokio::task::spawn_blocking(move || match hash {
        Some(hash) => passwords.verify(&password, &hash),
        None => {
            passwords.verify(&password, decoy_hash());
            false
        }
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Password check task failed");
        ApiError::internal("credential check failed")
    })?;

    let record = match record {
        Some(record) if matches => record,
        _ => {
            tracing::info!(username = %request.username, "Login rejected");
            return Err(invalid_credentials());
        }
    };

    let token = state.tokens.issue(&record.username).map_err(|e| {
        tracing::error!(error = %e, "Token issuance failed");
        ApiError::internal("token issuance failed")
    })?;

    tracing::info!(username = %record.username, "Login succeeded");
    Ok(Json(LoginResponse { token }))
}
