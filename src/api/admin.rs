// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role-restricted endpoints.
//!
//! Access is decided by the policy table (`/api/admin/hello-user` needs
//! `USER`, the rest of `/api/admin/**` needs `ADMIN`); handlers only read
//! the principal.

use axum::Json;

use crate::{auth::CurrentUser, models::MessageResponse};

#[utoipa::path(
    get,
    path = "/api/admin/hello",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Greeting for administrators", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = crate::auth::ErrorPayload),
        (status = 403, description = "Missing ADMIN role", body = crate::auth::ErrorPayload),
    )
)]
pub async fn admin_hello(CurrentUser(user): CurrentUser) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!("Hello, administrator {}!", user.username)))
}

#[utoipa::path(
    get,
    path = "/api/admin/hello-user",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Greeting for regular users", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = crate::auth::ErrorPayload),
        (status = 403, description = "Missing USER role", body = crate::auth::ErrorPayload),
    )
)]
pub async fn user_hello(CurrentUser(user): CurrentUser) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!("Hello, user {}!", user.username)))
}
