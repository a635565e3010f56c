// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User account store.
//!
//! The gate only needs lookup by email; registration and admin tooling need
//! the write side. The trait is the seam where a relational backend plugs in.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::auth::Role;

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique account identity
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    /// Current role
    pub role: Role,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user {0} already exists")]
    AlreadyExists(String),
    #[error("user {0} not found")]
    NotFound(String),
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact match on the email column.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    async fn insert(&self, user: UserRecord) -> StoreResult<UserRecord>;

    /// Returns `true` if a record was removed.
    async fn delete_by_email(&self, email: &str) -> StoreResult<bool>;

    async fn update_role(&self, email: &str, role: Role) -> StoreResult<UserRecord>;

    async fn count(&self) -> StoreResult<usize>;
}

/// Process-local store keyed by email.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert(&self, user: UserRecord) -> StoreResult<UserRecord> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(StoreError::AlreadyExists(user.email));
        }
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn delete_by_email(&self, email: &str) -> StoreResult<bool> {
        Ok(self.users.write().await.remove(email).is_some())
    }

    async fn update_role(&self, email: &str, role: Role) -> StoreResult<UserRecord> {
        let mut users = self.users.write().await;
        match users.get_mut(email) {
            Some(user) => {
                user.role = role;
                Ok(user.clone())
            }
            None => Err(StoreError::NotFound(email.to_string())),
        }
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.users.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(email: &str, role: Role) -> UserRecord {
        UserRecord {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn insert_and_find() {
        let store = InMemoryUserStore::new();
        store.insert(record("alice@example.com", Role::User)).await.unwrap();

        let found = store.find_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.role), Some(Role::User));
        assert!(store.find_by_email("ALICE@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_insert_fails() {
        let store = InMemoryUserStore::new();
        store.insert(record("alice@example.com", Role::User)).await.unwrap();
        let err = store
            .insert(record("alice@example.com", Role::Admin))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn delete_and_update_role() {
        let store = InMemoryUserStore::new();
        store.insert(record("bob@example.com", Role::User)).await.unwrap();

        let updated = store.update_role("bob@example.com", Role::Admin).await.unwrap();
        assert_eq!(updated.role, Role::Admin);

        assert!(store.delete_by_email("bob@example.com").await.unwrap());
        assert!(!store.delete_by_email("bob@example.com").await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);

        let err = store.update_role("bob@example.com", Role::User).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
