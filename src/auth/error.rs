// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiResponse;

/// Rejection reasons produced while authenticating or authorizing a request.
///
/// The first five variants are caused by the client and are surfaced verbatim.
/// `Internal` carries detail for the server log only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization: Bearer` header present
    MissingToken,
    /// Token cannot be parsed into header, claims and signature
    MalformedToken,
    /// Token signature does not match the signing key
    InvalidSignature,
    /// Token validity window has elapsed
    Expired,
    /// Token subject no longer exists in the user store
    UnknownSubject,
    /// Authenticated, but the role is not permitted on this route
    RoleDenied,
    /// Internal error (user store unreachable, key misconfiguration)
    Internal(String),
}

/// Outcome of running the gate on one request.
pub type AuthOutcome = Result<super::Principal, AuthError>;

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "token_expired",
            AuthError::UnknownSubject => "unknown_subject",
            AuthError::RoleDenied => "role_denied",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::RoleDenied => StatusCode::FORBIDDEN,
            AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::UnknownSubject => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client. Never includes internal detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "An authentication token is mandatory",
            AuthError::MalformedToken => "Token is malformed",
            AuthError::InvalidSignature => "Invalid token",
            AuthError::Expired => "Token has expired",
            AuthError::UnknownSubject => "The account for this token no longer exists",
            AuthError::RoleDenied => "You are not permitted to perform this operation",
            AuthError::Internal(_) => "Token validation failed",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Internal(msg) => write!(f, "Internal authentication error: {msg}"),
            other => f.write_str(other.public_message()),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(detail) = &self {
            tracing::error!(error = %detail, "authentication failed with internal fault");
        }
        let status = self.status_code();
        let body = Json(ApiResponse::failure(vec![self.public_message().to_string()]));
        (status, body).into_response()
    }
}
