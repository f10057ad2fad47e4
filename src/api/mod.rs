// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{middleware::gate, ErrorPayload, Principal},
    models::{LoginRequest, LoginResponse, MessageResponse},
    state::AppState,
};

pub mod admin;
pub mod auth;
pub mod health;
pub mod posts;
pub mod users;

/// Build the application router with the authentication gate applied.
///
/// Every route, Swagger UI included, sits behind the gate; the policy
/// table decides which of them are public.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/hello", get(health::hello))
        .route("/health", get(health::liveness))
        .route("/api/auth/login", post(auth::login))
        .route("/api/posts/public/list", get(posts::public_list))
        .route("/api/posts/protected/my-favorites", get(posts::my_favorites))
        .route("/api/admin/hello", get(admin::admin_hello))
        .route("/api/admin/hello-user", get(admin::user_hello))
        .route("/api/users/me", get(users::get_current_user))
        .with_state(state.clone())
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    gate(routes, state)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        health::hello,
        auth::login,
        posts::public_list,
        posts::my_favorites,
        admin::admin_hello,
        admin::user_hello,
        users::get_current_user
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            MessageResponse,
            ErrorPayload,
            Principal,
            health::HealthResponse,
            users::UserMeResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Health", description = "Liveness and greeting"),
        (name = "Auth", description = "Credential exchange for bearer tokens"),
        (name = "Posts", description = "Demo post listings"),
        (name = "Admin", description = "Role-restricted greetings"),
        (name = "Users", description = "Current user information")
    )
)]
struct ApiDoc;
