// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless session tokens and role-based request authorization.
//!
//! ## Auth Flow
//!
//! 1. Client logs in at `/api/auth/login` and receives a signed token
//! 2. Client sends `Authorization: Bearer <token>` on every `/api` request
//! 3. The gate:
//!    - Verifies the HS256 signature and the 24h expiry
//!    - Resolves `sub` against the user store (current role, account exists)
//!    - Checks the role policy for the method and path
//!    - Attaches the [`Principal`] to the request
//!
//! ## Security
//!
//! - Roles are never read from the token
//! - Expiry is an exclusive bound, no clock skew leeway
//! - Tokens are not revocable before expiry; deleting the account is

pub mod claims;
pub mod clock;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod key;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod resolver;
pub mod roles;

pub use claims::{Principal, TokenClaims};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{IssuedToken, TokenCodec, DEFAULT_TOKEN_VALIDITY};
pub use error::{AuthError, AuthOutcome};
pub use extractor::Auth;
pub use key::{KeyError, SigningKey};
pub use middleware::{auth_gate, AuthGate, GateScope};
pub use policy::{PolicyError, PolicyFallback, RolePolicy};
pub use resolver::PrincipalResolver;
pub use roles::Role;
