// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Post endpoints: one public listing, one per-user listing.

use axum::Json;

use crate::{
    auth::{CurrentUser, MaybeUser},
    models::MessageResponse,
};

/// Popular posts, visible to anyone.
#[utoipa::path(
    get,
    path = "/api/posts/public/list",
    tag = "Posts",
    responses(
        (status = 200, description = "Public post list", body = MessageResponse),
    )
)]
pub async fn public_list(MaybeUser(user): MaybeUser) -> Json<MessageResponse> {
    let message = match user {
        Some(user) => format!("Popular posts, picked for {}.", user.username),
        None => "Popular posts, visible to everyone.".to_string(),
    };
    Json(MessageResponse::new(message))
}

/// The caller's favourite posts.
#[utoipa::path(
    get,
    path = "/api/posts/protected/my-favorites",
    tag = "Posts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Favourite posts", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = crate::auth::ErrorPayload),
    )
)]
pub async fn my_favorites(CurrentUser(user): CurrentUser) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!(
        "Favourite posts of {}.",
        user.username
    )))
}
