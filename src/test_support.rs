// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;

use crate::auth::{
    password, ManualClock, PolicyFallback, Role, RolePolicy, SigningKey, TokenCodec,
    DEFAULT_TOKEN_VALIDITY,
};
use crate::state::AppState;
use crate::store::{InMemoryUserStore, StoreError, StoreResult, UserRecord, UserStore};

pub(crate) const TEST_SECRET: &str = "unit-test-signing-secret-0123456789abcdef";

/// Start of every test clock.
pub(crate) const EPOCH: i64 = 1_700_000_000;

/// App state wired to a manual clock and an in-memory store.
pub(crate) struct TestApp {
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub users: Arc<InMemoryUserStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserStore::new());
        Self::build(users.clone(), users)
    }

    /// State whose user store fails every call.
    pub fn with_broken_store() -> Self {
        Self::build(Arc::new(BrokenStore), Arc::new(InMemoryUserStore::new()))
    }

    fn build(store: Arc<dyn UserStore>, users: Arc<InMemoryUserStore>) -> Self {
        let clock = Arc::new(ManualClock::new(DateTime::from_timestamp(EPOCH, 0).unwrap()));
        let codec = TokenCodec::with_clock(
            SigningKey::from_secret(TEST_SECRET).unwrap(),
            DEFAULT_TOKEN_VALIDITY,
            clock.clone(),
        );
        let policy = RolePolicy::library_default(PolicyFallback::Permit).unwrap();
        Self {
            state: AppState::new(store, Arc::new(codec), policy),
            clock,
            users,
        }
    }

    pub fn issue(&self, subject: &str) -> String {
        self.state.codec.issue(subject).unwrap().token
    }
}

pub(crate) async fn seed_user(users: &InMemoryUserStore, email: &str, password: &str, role: Role) {
    users
        .insert(UserRecord {
            email: email.to_string(),
            password_hash: password::hash_password(password).unwrap(),
            role,
        })
        .await
        .unwrap();
}

pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub(crate) struct BrokenStore;

#[async_trait]
impl UserStore for BrokenStore {
    async fn find_by_email(&self, _email: &str) -> StoreResult<Option<UserRecord>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
    async fn insert(&self, _user: UserRecord) -> StoreResult<UserRecord> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
    async fn delete_by_email(&self, _email: &str) -> StoreResult<bool> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
    async fn update_role(&self, _email: &str, _role: Role) -> StoreResult<UserRecord> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
    async fn count(&self) -> StoreResult<usize> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}
