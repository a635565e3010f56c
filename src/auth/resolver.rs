// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Maps a verified token subject to the live account.

use std::sync::Arc;

use super::{AuthError, Principal};
use crate::store::UserStore;

/// Resolves token subjects against the user store.
///
/// One lookup per call, no caching: a deleted account is rejected on the very
/// next request and a role change takes effect immediately.
#[derive(Clone)]
pub struct PrincipalResolver {
    users: Arc<dyn UserStore>,
}

impl PrincipalResolver {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn resolve(&self, subject: &str) -> Result<Principal, AuthError> {
        let user = self
            .users
            .find_by_email(subject)
            .await
            .map_err(|e| AuthError::Internal(format!("user lookup: {e}")))?
            .ok_or(AuthError::UnknownSubject)?;

        Ok(Principal::new(user.email, user.role))
    }
}
