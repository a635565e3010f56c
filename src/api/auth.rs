// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and registration.
//!
//! Both routes sit on the gate's allow-list. Login is the only caller of
//! [`TokenCodec::issue`](crate::auth::TokenCodec::issue).

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{password, Role},
    error::ApiError,
    models::{ApiResponse, EmptyData, LoginData, LoginRequest, RegisterRequest, UserView},
    state::AppState,
    store::{StoreError, UserRecord},
};

const WRONG_CREDENTIALS: &str = "Wrong credentials";
const EMAIL_TAKEN: &str = "The email is already being used";

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<LoginData>),
        (status = 400, description = "Invalid request body", body = ApiResponse<EmptyData>),
        (status = 401, description = "Wrong credentials", body = ApiResponse<EmptyData>)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginData>>, ApiError> {
    let Json(request) = payload?;

    let user = state
        .users
        .find_by_email(request.email.trim())
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::unauthorized(WRONG_CREDENTIALS))?;

    let stored_hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || {
        password::verify_password(&request.password, &stored_hash)
    })
    .await
    .map_err(ApiError::internal)?
    .map_err(ApiError::internal)?;

    if !valid {
        return Err(ApiError::unauthorized(WRONG_CREDENTIALS));
    }

    let issued = state.codec.issue(&user.email).map_err(ApiError::internal)?;
    tracing::debug!(email = %user.email, role = %user.role, "issued session token");

    Ok(Json(ApiResponse::success(
        "Login successful",
        LoginData {
            email: user.email,
            role: user.role,
            token: issued.token,
            expires_at: issued.claims.exp,
        },
    )))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserView>),
        (status = 400, description = "Validation failed", body = ApiResponse<EmptyData>)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UserView>>), ApiError> {
    let Json(request) = payload?;
    let email = request.email.trim().to_string();

    let mut errors = Vec::new();
    if email.is_empty() {
        errors.push("The email is required".to_string());
    }
    if request.password.trim().is_empty() {
        errors.push("The password is required".to_string());
    } else if request.password != request.repeat_password {
        errors.push("The passwords don't match".to_string());
    }
    if !errors.is_empty() {
        return Err(ApiError::with_messages(StatusCode::BAD_REQUEST, errors));
    }

    if state
        .users
        .find_by_email(&email)
        .await
        .map_err(ApiError::internal)?
        .is_some()
    {
        return Err(ApiError::bad_request(EMAIL_TAKEN));
    }

    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&request.password))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)?;

    let user = state
        .users
        .insert(UserRecord {
            email,
            password_hash,
            role: Role::User,
        })
        .await
        .map_err(|e| match e {
            StoreError::AlreadyExists(_) => ApiError::bad_request(EMAIL_TAKEN),
            other => ApiError::internal(other),
        })?;

    tracing::info!(role = %user.role, "registered new account");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Account created",
            UserView {
                email: user.email,
                role: user.role,
            },
        )),
    ))
}
