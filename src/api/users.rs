// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;

use crate::{
    auth::{Auth, Principal},
    models::{ApiResponse, UserView},
};

impl From<Principal> for UserView {
    fn from(principal: Principal) -> Self {
        Self {
            email: principal.identity,
            role: principal.role,
        }
    }
}

/// Get the current authenticated user's identity and role.
///
/// The role is the one stored at the time of this request, not at login.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = ApiResponse<UserView>),
        (status = 401, description = "Invalid, expired or orphaned token"),
        (status = 403, description = "Missing token"),
    )
)]
pub async fn get_current_user(Auth(principal): Auth) -> Json<ApiResponse<UserView>> {
    Json(ApiResponse::success("Current user", principal.into()))
}
