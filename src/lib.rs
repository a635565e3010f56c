// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Libridex - Library Catalogue API Server
//!
//! This crate provides the authentication and authorization core of the
//! library catalogue REST backend: signed session tokens issued at login,
//! verified on every `/api` request, resolved to the caller's current role
//! and checked against a static route policy.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token codec, auth gate, role policy
//! - `config` - Environment configuration
//! - `store` - User account store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_support;
