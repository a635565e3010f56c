// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET_KEY` | Secret the token signing key is derived from (>= 32 bytes) | Required |
//! | `TOKEN_VALIDITY_SECS` | Session token lifetime | `86400` |
//! | `POLICY_DEFAULT_DENY` | Deny routes without a role policy entry | `false` |
//! | `CORS_ALLOWED_ORIGIN` | Browser origin allowed by CORS | `http://localhost:8081` |
//! | `SEED_ADMIN_EMAIL` | Admin account created at startup | Optional |
//! | `SEED_ADMIN_PASSWORD` | Password for the seeded admin | Required with `SEED_ADMIN_EMAIL` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use chrono::Duration;

use crate::auth::{PolicyFallback, DEFAULT_TOKEN_VALIDITY};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_KEY_ENV: &str = "JWT_SECRET_KEY";
pub const TOKEN_VALIDITY_SECS_ENV: &str = "TOKEN_VALIDITY_SECS";
pub const POLICY_DEFAULT_DENY_ENV: &str = "POLICY_DEFAULT_DENY";
pub const CORS_ALLOWED_ORIGIN_ENV: &str = "CORS_ALLOWED_ORIGIN";
pub const SEED_ADMIN_EMAIL_ENV: &str = "SEED_ADMIN_EMAIL";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8081";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Admin account to create on startup.
#[derive(Clone)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
}

/// Process configuration.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_validity: Duration,
    pub policy_fallback: PolicyFallback,
    pub cors_allowed_origin: String,
    pub seed_admin: Option<SeedAdmin>,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("token_validity", &self.token_validity)
            .field("policy_fallback", &self.policy_fallback)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("seed_admin", &self.seed_admin.as_ref().map(|s| &s.email))
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get(PORT_ENV) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: PORT_ENV,
                value: raw,
                reason: "expected a port number",
            })?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = get(JWT_SECRET_KEY_ENV).ok_or(ConfigError::Missing(JWT_SECRET_KEY_ENV))?;

        let token_validity = match get(TOKEN_VALIDITY_SECS_ENV) {
            Some(raw) => match raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .and_then(Duration::try_seconds)
            {
                Some(validity) => validity,
                None => {
                    return Err(ConfigError::Invalid {
                        var: TOKEN_VALIDITY_SECS_ENV,
                        value: raw,
                        reason: "expected a positive number of seconds",
                    })
                }
            },
            None => DEFAULT_TOKEN_VALIDITY,
        };

        let policy_fallback = match get(POLICY_DEFAULT_DENY_ENV) {
            Some(raw) => match parse_bool(&raw) {
                Some(true) => PolicyFallback::Deny,
                Some(false) => PolicyFallback::Permit,
                None => {
                    return Err(ConfigError::Invalid {
                        var: POLICY_DEFAULT_DENY_ENV,
                        value: raw,
                        reason: "expected true or false",
                    })
                }
            },
            None => PolicyFallback::Permit,
        };

        let cors_allowed_origin =
            get(CORS_ALLOWED_ORIGIN_ENV).unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());

        let seed_admin = match get(SEED_ADMIN_EMAIL_ENV) {
            Some(email) => Some(SeedAdmin {
                email,
                password: get(SEED_ADMIN_PASSWORD_ENV)
                    .ok_or(ConfigError::Missing(SEED_ADMIN_PASSWORD_ENV))?,
            }),
            None => None,
        };

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.to_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_validity,
            policy_fallback,
            cors_allowed_origin,
            seed_admin,
            log_format,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
