// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate for Axum.
//!
//! Every request under the protected prefix passes through [`auth_gate`]
//! before reaching a handler:
//!
//! 1. Allow-listed paths (login, register) and paths outside the prefix are
//!    forwarded untouched.
//! 2. `Authorization: Bearer <token>` is required, otherwise `MissingToken`.
//! 3. The token is verified by the [`TokenCodec`].
//! 4. The subject is resolved to a live [`Principal`].
//! 5. The [`RolePolicy`] is consulted for the method and path.
//! 6. The principal is attached to the request extensions and the request
//!    proceeds.
//!
//! Any rejection ends the request with the matching error response.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/api/users/me", get(users::get_current_user))
//!     .layer(axum::middleware::from_fn_with_state(gate, auth_gate));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, AuthOutcome, PrincipalResolver, RolePolicy, TokenCodec};

const BEARER_PREFIX: &str = "Bearer ";

/// Which paths the gate guards.
#[derive(Debug, Clone)]
pub struct GateScope {
    protected_prefix: String,
    allow_list: Vec<String>,
}

impl GateScope {
    pub fn new(protected_prefix: impl Into<String>) -> Self {
        Self {
            protected_prefix: protected_prefix.into(),
            allow_list: Vec::new(),
        }
    }

    /// Exempt an exact path from authentication.
    pub fn allow(mut self, path: impl Into<String>) -> Self {
        self.allow_list.push(path.into());
        self
    }

    pub fn requires_auth(&self, path: &str) -> bool {
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        let under_prefix = path == self.protected_prefix
            || path
                .strip_prefix(self.protected_prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'));

        under_prefix && !self.allow_list.iter().any(|allowed| allowed == path)
    }
}

impl Default for GateScope {
    fn default() -> Self {
        Self::new("/api")
            .allow("/api/auth/login")
            .allow("/api/auth/register")
    }
}

/// Everything the gate needs, shared read-only across requests.
#[derive(Clone)]
pub struct AuthGate {
    codec: Arc<TokenCodec>,
    resolver: PrincipalResolver,
    policy: Arc<RolePolicy>,
    scope: Arc<GateScope>,
}

impl AuthGate {
    pub fn new(
        codec: Arc<TokenCodec>,
        resolver: PrincipalResolver,
        policy: Arc<RolePolicy>,
        scope: GateScope,
    ) -> Self {
        Self {
            codec,
            resolver,
            policy,
            scope: Arc::new(scope),
        }
    }

    /// Verify the bearer token in `headers` and resolve its principal.
    pub async fn authenticate(&self, headers: &HeaderMap) -> AuthOutcome {
        let token = bearer_token(headers)?;
        let claims = self.codec.verify(token)?;
        self.resolver.resolve(claims.subject()).await
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthError::MissingToken)
}

/// Authentication and authorization middleware.
pub async fn auth_gate(State(gate): State<AuthGate>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if !gate.scope.requires_auth(&path) {
        return next.run(request).await;
    }

    let principal = match gate.authenticate(request.headers()).await {
        Ok(principal) => principal,
        Err(err) => {
            tracing::debug!(path = %path, reason = err.error_code(), "request rejected by auth gate");
            return err.into_response();
        }
    };

    if !gate
        .policy
        .authorize(Some(&principal), request.method(), &path)
    {
        tracing::debug!(
            path = %path,
            method = %request.method(),
            role = %principal.role,
            "request denied by role policy"
        );
        return AuthError::RoleDenied.into_response();
    }

    request.extensions_mut().insert(principal);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Principal, Role};
    use crate::store::UserStore;
    use crate::test_support::{bearer, seed_user, TestApp};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        routing::get,
        Extension, Json, Router,
    };
    use chrono::Duration;
    use tower::ServiceExt;

    async fn whoami(Extension(principal): Extension<Principal>) -> Json<Principal> {
        Json(principal)
    }

    async fn open() -> &'static str {
        "open"
    }

    fn router(app: &TestApp) -> Router {
        Router::new()
            .route("/api/books", get(whoami).post(whoami))
            .route("/api/books/{id}", get(whoami).delete(whoami))
            .route("/api/customers", get(whoami))
            .route("/api/auth/login", get(open).post(open))
            .route("/health", get(open))
            .layer(axum::middleware::from_fn_with_state(
                app.state.gate.clone(),
                auth_gate,
            ))
    }

    async fn send(app: &TestApp, method: &str, uri: &str, auth: Option<String>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        router(app)
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn message(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        body["message"][0].as_str().unwrap().to_string()
    }

    #[test]
    fn default_scope_guards_api_except_auth_routes() {
        let scope = GateScope::default();
        assert!(scope.requires_auth("/api/books"));
        assert!(scope.requires_auth("/api"));
        assert!(scope.requires_auth("/api/auth/me"));
        assert!(!scope.requires_auth("/api/auth/login"));
        assert!(!scope.requires_auth("/api/auth/register/"));
        assert!(!scope.requires_auth("/health"));
        assert!(!scope.requires_auth("/apidocs"));
    }

    #[tokio::test]
    async fn missing_header_is_forbidden() {
        let app = TestApp::new();
        let response = send(&app, "GET", "/api/books", None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(message(response).await, "An authentication token is mandatory");
    }

    #[tokio::test]
    async fn wrong_scheme_is_missing_token() {
        let app = TestApp::new();
        let response = send(&app, "GET", "/api/books", Some("Basic dXNlcjpwdw==".into())).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn garbage_token_is_malformed() {
        let app = TestApp::new();
        let response = send(&app, "GET", "/api/books", Some("Bearer garbage".into())).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(message(response).await, "Token is malformed");
    }

    #[tokio::test]
    async fn valid_token_attaches_principal() {
        let app = TestApp::new();
        seed_user(&app.users, "alice@example.com", "pw", Role::User).await;
        let token = app.issue("alice@example.com");

        let response = send(&app, "GET", "/api/books", Some(bearer(&token))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let principal: Principal = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(principal, Principal::new("alice@example.com", Role::User));
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let app = TestApp::new();
        seed_user(&app.users, "alice@example.com", "pw", Role::User).await;
        let token = app.issue("alice@example.com");

        app.clock.advance(Duration::hours(24) + Duration::seconds(1));
        let response = send(&app, "GET", "/api/books", Some(bearer(&token))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(message(response).await, "Token has expired");
    }

    #[tokio::test]
    async fn deleted_account_is_unknown_subject() {
        let app = TestApp::new();
        seed_user(&app.users, "bob@example.com", "pw", Role::User).await;
        let token = app.issue("bob@example.com");
        app.users.delete_by_email("bob@example.com").await.unwrap();

        let response = send(&app, "GET", "/api/books", Some(bearer(&token))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            message(response).await,
            AuthError::UnknownSubject.public_message()
        );
    }

    #[tokio::test]
    async fn user_cannot_mutate_books() {
        let app = TestApp::new();
        seed_user(&app.users, "alice@example.com", "pw", Role::User).await;
        let token = app.issue("alice@example.com");

        let response = send(&app, "POST", "/api/books", Some(bearer(&token))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            message(response).await,
            "You are not permitted to perform this operation"
        );

        let response = send(&app, "DELETE", "/api/books/3", Some(bearer(&token))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_can_mutate_books() {
        let app = TestApp::new();
        seed_user(&app.users, "admin@example.com", "pw", Role::Admin).await;
        let token = app.issue("admin@example.com");

        let response = send(&app, "DELETE", "/api/books/3", Some(bearer(&token))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn role_change_applies_to_existing_token() {
        let app = TestApp::new();
        seed_user(&app.users, "alice@example.com", "pw", Role::User).await;
        let token = app.issue("alice@example.com");

        app.users
            .update_role("alice@example.com", Role::Admin)
            .await
            .unwrap();
        let response = send(&app, "POST", "/api/books", Some(bearer(&token))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unmatched_routes_are_open_to_any_role() {
        let app = TestApp::new();
        seed_user(&app.users, "alice@example.com", "pw", Role::User).await;
        let token = app.issue("alice@example.com");

        let response = send(&app, "GET", "/api/customers", Some(bearer(&token))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn login_skips_verification_whatever_the_header() {
        let app = TestApp::new();
        for header in [None, Some("Bearer garbage".to_string()), Some("junk".to_string())] {
            let response = send(&app, "POST", "/api/auth/login", header).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn paths_outside_prefix_are_not_gated() {
        let app = TestApp::new();
        let response = send(&app, "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn store_outage_is_internal_error() {
        let app = TestApp::with_broken_store();
        let token = app.issue("alice@example.com");

        let response = send(&app, "GET", "/api/books", Some(bearer(&token))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message(response).await, "Token validation failed");
    }
}
