// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing key material for session tokens.
//!
//! The key is derived once at startup from the configured secret and handed to
//! the [`TokenCodec`](super::TokenCodec). It is immutable afterwards and can be
//! read concurrently without synchronization.

use jsonwebtoken::{DecodingKey, EncodingKey};

/// Minimum secret length in bytes (256 bits, matching HS256 output size).
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("signing secret must be at least {min} bytes, got {0}", min = MIN_SECRET_LEN)]
    TooShort(usize),
}

/// HMAC signing key.
///
/// Holds both directions of the same symmetric secret. The secret bytes are
/// dropped after derivation and the type never prints them.
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    /// Derive the key from a configured secret string.
    pub fn from_secret(secret: &str) -> Result<Self, KeyError> {
        let bytes = secret.as_bytes();
        if bytes.len() < MIN_SECRET_LEN {
            return Err(KeyError::TooShort(bytes.len()));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        })
    }

    pub(crate) fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}
