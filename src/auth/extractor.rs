// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated principal.
//!
//! Use the `Auth` extractor in handlers behind the gate:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal is the caller's current identity and role
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Principal};

/// Extractor for the principal attached by the auth gate.
///
/// Never re-verifies the token. A handler using it on a route the gate does
/// not cover is a wiring fault and is reported as an internal error.
pub struct Auth(pub Principal);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Auth)
            .ok_or_else(|| {
                AuthError::Internal(format!(
                    "no principal attached for {}; route is not behind the auth gate",
                    parts.uri.path()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use axum::http::Request;

    #[tokio::test]
    async fn reads_principal_from_extensions() {
        let mut parts = Request::builder()
            .uri("/api/users/me")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        parts
            .extensions
            .insert(Principal::new("alice@example.com", Role::User));

        let Auth(principal) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(principal.identity, "alice@example.com");
    }

    #[tokio::test]
    async fn missing_principal_is_internal_error() {
        let mut parts = Request::builder()
            .uri("/api/users/me")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
