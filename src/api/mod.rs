// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{auth_gate, Principal, Role},
    config::{ConfigError, CORS_ALLOWED_ORIGIN_ENV},
    error::panic_response,
    models::{EmptyData, LoginData, LoginRequest, RegisterRequest, UserView},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod users;

/// Build the full application router.
///
/// The auth gate wraps the whole router, fallback included, so unrouted
/// `/api` paths are rejected before they can 404. The gate scope exempts
/// login, register and everything outside `/api`.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let gate = state.gate.clone();

    let routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/users/me", get(users::get_current_user))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(gate, auth_gate));

    with_service_layers(routes, cors)
}

fn with_service_layers(routes: Router, cors: CorsLayer) -> Router {
    routes.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(cors),
    )
}

/// CORS restricted to a single browser origin.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
        var: CORS_ALLOWED_ORIGIN_ENV,
        value: origin.to_string(),
        reason: "not a valid origin header value",
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any))
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
        auth::login,
        auth::register,
        users::get_current_user,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            LoginRequest,
            LoginData,
            RegisterRequest,
            UserView,
            Principal,
            Role,
            EmptyData
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Auth", description = "Login and registration"),
        (name = "Users", description = "Current user"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
