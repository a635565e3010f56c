// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{
    password, AuthGate, GateScope, KeyError, PolicyError, PrincipalResolver, Role, RolePolicy,
    SigningKey, SystemClock, TokenCodec,
};
use crate::config::{Config, SeedAdmin};
use crate::store::{StoreError, UserRecord, UserStore};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("signing key: {0}")]
    Key(#[from] KeyError),
    #[error("role policy: {0}")]
    Policy(#[from] PolicyError),
    #[error("seed admin: {0}")]
    Seed(String),
}

/// Shared application state.
///
/// Every component is constructed once at startup and is read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub codec: Arc<TokenCodec>,
    pub gate: AuthGate,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, codec: Arc<TokenCodec>, policy: RolePolicy) -> Self {
        let gate = AuthGate::new(
            codec.clone(),
            PrincipalResolver::new(users.clone()),
            Arc::new(policy),
            GateScope::default(),
        );
        Self { users, codec, gate }
    }

    /// Derive the signing key and policy table from configuration.
    pub fn from_config(config: &Config, users: Arc<dyn UserStore>) -> Result<Self, StartupError> {
        let key = SigningKey::from_secret(&config.jwt_secret)?;
        let codec = TokenCodec::with_clock(key, config.token_validity, Arc::new(SystemClock));
        let policy = RolePolicy::library_default(config.policy_fallback)?;
        tracing::info!(
            rules = policy.len(),
            fallback = ?policy.fallback(),
            "role policy loaded"
        );
        Ok(Self::new(users, Arc::new(codec), policy))
    }

    /// Create the configured admin account, or promote it if it exists.
    pub async fn seed_admin(&self, seed: &SeedAdmin) -> Result<(), StartupError> {
        let password_hash =
            password::hash_password(&seed.password).map_err(|e| StartupError::Seed(e.to_string()))?;
        let record = UserRecord {
            email: seed.email.clone(),
            password_hash,
            role: Role::Admin,
        };

        match self.users.insert(record).await {
            Ok(_) => Ok(()),
            Err(StoreError::AlreadyExists(_)) => self
                .users
                .update_role(&seed.email, Role::Admin)
                .await
                .map(|_| ())
                .map_err(|e| StartupError::Seed(e.to_string())),
            Err(e) => Err(StartupError::Seed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryUserStore;
    use crate::test_support::TEST_SECRET;

    fn config(secret: &str) -> Config {
        Config::from_lookup(|key| match key {
            crate::config::JWT_SECRET_KEY_ENV => Some(secret.to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn short_secret_fails_startup() {
        let result = AppState::from_config(&config("short"), Arc::new(InMemoryUserStore::new()));
        assert!(matches!(result, Err(StartupError::Key(_))));
    }

    #[tokio::test]
    async fn seed_admin_creates_then_promotes() {
        let users = Arc::new(InMemoryUserStore::new());
        let state = AppState::from_config(&config(TEST_SECRET), users.clone()).unwrap();
        let seed = SeedAdmin {
            email: "admin@example.com".to_string(),
            password: "changeme".to_string(),
        };

        state.seed_admin(&seed).await.unwrap();
        let stored = users.find_by_email("admin@example.com").await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Admin);
        assert!(password::verify_password("changeme", &stored.password_hash).unwrap());

        users.update_role("admin@example.com", Role::User).await.unwrap();
        state.seed_admin(&seed).await.unwrap();
        let stored = users.find_by_email("admin@example.com").await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Admin);
    }
}
