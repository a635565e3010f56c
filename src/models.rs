// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API. All responses use
//! the [`ApiResponse`] envelope: a success flag, an ordered list of
//! human-readable messages and a data payload (empty on failure).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Role;

// =============================================================================
// Envelope
// =============================================================================

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Human-readable messages, in order.
    pub message: Vec<String>,
    /// Payload; an empty object on failure.
    pub data: T,
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct EmptyData {}

impl ApiResponse<EmptyData> {
    pub fn failure(message: Vec<String>) -> Self {
        Self {
            success: false,
            message,
            data: EmptyData {},
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: vec![message.into()],
            data,
        }
    }
}

// =============================================================================
// Auth Models
// =============================================================================

/// Credentials for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub email: String,
    pub role: Role,
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// Token expiry (UNIX seconds, exclusive).
    pub expires_at: i64,
}

/// New account for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub repeat_password: String,
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserView {
    pub email: String,
    pub role: Role,
}
