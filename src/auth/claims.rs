// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the authenticated principal.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Claims carried inside a session token.
///
/// Built once at issuance and reconstructed unchanged at verification.
/// Invariant: `exp == iat + validity window`. No role is embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (the account email)
    pub sub: String,

    /// Issued at (UNIX seconds)
    pub iat: i64,

    /// Expiration (UNIX seconds, exclusive)
    pub exp: i64,

    /// Unique per issuance
    pub jti: String,
}

impl TokenClaims {
    pub fn subject(&self) -> &str {
        &self.sub
    }
}

/// Identity attached to a request after the gate succeeds.
///
/// This is the primary type used throughout the application to represent
/// the caller. Its role is the one currently stored for the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    /// Account email
    pub identity: String,

    /// Current role of the account
    pub role: Role,
}

impl Principal {
    pub fn new(identity: impl Into<String>, role: Role) -> Self {
        Self {
            identity: identity.into(),
            role,
        }
    }
}
