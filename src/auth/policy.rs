// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route-level role policy.
//!
//! A static table mapping `(method, path pattern)` to the roles allowed on it.
//! Built once at startup and shared read-only by every request.
//!
//! ## Pattern syntax
//!
//! - `/api/books` matches that path only
//! - `/api/books/**` matches `/api/books` and anything below it
//!
//! ## Matching
//!
//! The most specific matching entry decides: more literal segments first, then
//! exact over wildcard, then method-specific over method-agnostic. Routes with
//! no matching entry fall through to [`PolicyFallback`].

use std::collections::BTreeSet;

use axum::http::Method;

use super::{Principal, Role};

/// Decision for routes that no entry matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyFallback {
    /// Any caller that passed the gate is let through.
    #[default]
    Permit,
    /// Unmatched routes are refused.
    Deny,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("invalid path pattern {0:?}: must start with '/' and may only end in '/**'")]
    InvalidPattern(String),
    #[error("conflicting role sets for {method} {pattern}")]
    Conflict { method: String, pattern: String },
    #[error("entry for {0} allows no roles")]
    EmptyRoles(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathPattern {
    Exact(String),
    Subtree(String),
}

impl PathPattern {
    fn parse(raw: &str) -> Result<Self, PolicyError> {
        if !raw.starts_with('/') {
            return Err(PolicyError::InvalidPattern(raw.to_string()));
        }
        let (base, subtree) = match raw.strip_suffix("/**") {
            Some(base) => (base, true),
            None => (raw, false),
        };
        if base.contains('*') {
            return Err(PolicyError::InvalidPattern(raw.to_string()));
        }
        let base = normalize(base).to_string();
        Ok(if subtree {
            PathPattern::Subtree(base)
        } else {
            PathPattern::Exact(base)
        })
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(p) => p == path,
            PathPattern::Subtree(base) if base.is_empty() || base == "/" => true,
            PathPattern::Subtree(base) => {
                path == base
                    || path
                        .strip_prefix(base.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }

    fn base(&self) -> &str {
        match self {
            PathPattern::Exact(p) | PathPattern::Subtree(p) => p,
        }
    }

    fn specificity(&self) -> (usize, bool) {
        let segments = self.base().split('/').filter(|s| !s.is_empty()).count();
        (segments, matches!(self, PathPattern::Exact(_)))
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathPattern::Exact(p) => f.write_str(p),
            PathPattern::Subtree(p) => write!(f, "{p}/**"),
        }
    }
}

fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

/// One row of the policy table.
#[derive(Debug, Clone)]
pub struct RoutePolicyEntry {
    method: Option<Method>,
    pattern: PathPattern,
    allowed: BTreeSet<Role>,
}

impl RoutePolicyEntry {
    fn applies_to(&self, method: &Method, path: &str) -> bool {
        self.method.as_ref().is_none_or(|m| m == method) && self.pattern.matches(path)
    }

    fn specificity(&self) -> (usize, bool, bool) {
        let (segments, exact) = self.pattern.specificity();
        (segments, exact, self.method.is_some())
    }

    fn label(&self) -> (String, String) {
        let method = self
            .method
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "*".to_string());
        (method, self.pattern.to_string())
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }
}

/// Builder for [`RolePolicy`].
#[derive(Debug, Default)]
pub struct RolePolicyBuilder {
    rules: Vec<(Option<Method>, String, Vec<Role>)>,
    fallback: PolicyFallback,
}

impl RolePolicyBuilder {
    /// Restrict `method` on `pattern` to `roles`.
    pub fn rule(mut self, method: Method, pattern: &str, roles: &[Role]) -> Self {
        self.rules.push((Some(method), pattern.to_string(), roles.to_vec()));
        self
    }

    /// Restrict every method on `pattern` to `roles`.
    pub fn any_method(mut self, pattern: &str, roles: &[Role]) -> Self {
        self.rules.push((None, pattern.to_string(), roles.to_vec()));
        self
    }

    pub fn fallback(mut self, fallback: PolicyFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Parse patterns and reject ambiguous tables.
    pub fn build(self) -> Result<RolePolicy, PolicyError> {
        let mut entries: Vec<RoutePolicyEntry> = Vec::with_capacity(self.rules.len());

        for (method, raw, roles) in self.rules {
            let pattern = PathPattern::parse(&raw)?;
            if roles.is_empty() {
                return Err(PolicyError::EmptyRoles(raw));
            }
            let entry = RoutePolicyEntry {
                method,
                pattern,
                allowed: roles.into_iter().collect(),
            };

            if let Some(existing) = entries
                .iter()
                .find(|e| e.method == entry.method && e.pattern == entry.pattern)
            {
                if existing.allowed != entry.allowed {
                    let (method, pattern) = entry.label();
                    return Err(PolicyError::Conflict { method, pattern });
                }
                continue;
            }
            entries.push(entry);
        }

        Ok(RolePolicy {
            entries,
            fallback: self.fallback,
        })
    }
}

/// Immutable route → roles table.
#[derive(Debug, Clone)]
pub struct RolePolicy {
    entries: Vec<RoutePolicyEntry>,
    fallback: PolicyFallback,
}

impl RolePolicy {
    pub fn builder() -> RolePolicyBuilder {
        RolePolicyBuilder::default()
    }

    /// Catalogue rules: book mutations are ADMIN only, browsing needs any
    /// signed-in account.
    pub fn library_default(fallback: PolicyFallback) -> Result<Self, PolicyError> {
        const READERS: &[Role] = &[Role::User, Role::Admin];
        const ADMINS: &[Role] = &[Role::Admin];

        Self::builder()
            .rule(Method::POST, "/api/books", ADMINS)
            .rule(Method::PUT, "/api/books/**", ADMINS)
            .rule(Method::DELETE, "/api/books/**", ADMINS)
            .rule(Method::GET, "/api/books", READERS)
            .rule(Method::GET, "/api/books/**", READERS)
            .rule(Method::GET, "/api/books/search", READERS)
            .rule(Method::GET, "/api/users/me", READERS)
            .fallback(fallback)
            .build()
    }

    pub fn fallback(&self) -> PolicyFallback {
        self.fallback
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Most specific entry covering this request, if any.
    pub fn find(&self, method: &Method, path: &str) -> Option<&RoutePolicyEntry> {
        let path = normalize(path);
        self.entries
            .iter()
            .filter(|e| e.applies_to(method, path))
            .max_by_key(|e| e.specificity())
    }

    /// Decide whether `principal` may call `method path`.
    ///
    /// A matching entry requires an authenticated principal holding one of its
    /// roles. Unmatched routes follow the fallback.
    pub fn authorize(&self, principal: Option<&Principal>, method: &Method, path: &str) -> bool {
        match self.find(method, path) {
            Some(entry) => principal.is_some_and(|p| entry.allows(p.role)),
            None => self.fallback == PolicyFallback::Permit,
        }
    }
}
