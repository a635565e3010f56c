// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance and verification.
//!
//! Tokens are compact HS256 JWTs: `base64url(header).base64url(claims).base64url(sig)`.
//! The claims are `sub`, `iat`, `exp` and a random `jti`. Roles are not
//! embedded; they are resolved from the user store on every request.
//!
//! Verification order:
//!
//! 1. Empty input → `MissingToken`
//! 2. Structure / encoding → `MalformedToken`
//! 3. HMAC over header and claims → `InvalidSignature`
//! 4. `now >= exp` → `Expired`

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, Header, Validation};
use uuid::Uuid;

use super::{
    clock::{Clock, SystemClock},
    AuthError, SigningKey, TokenClaims,
};

/// Default token validity window (24 hours).
pub const DEFAULT_TOKEN_VALIDITY: Duration = Duration::hours(24);

const ALGORITHM: Algorithm = Algorithm::HS256;

/// A freshly minted token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

/// Encodes identities into signed tokens and verifies them back.
///
/// Owns the process signing key. Shared behind an `Arc`; all methods take
/// `&self` and never mutate.
pub struct TokenCodec {
    key: SigningKey,
    validity: Duration,
    clock: Arc<dyn Clock>,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec using the wall clock and the default 24h window.
    pub fn new(key: SigningKey) -> Self {
        Self::with_clock(key, DEFAULT_TOKEN_VALIDITY, Arc::new(SystemClock))
    }

    pub fn with_clock(key: SigningKey, validity: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against our own clock with an exclusive bound.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        Self {
            key,
            validity,
            clock,
            validation,
        }
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Mint a token for `subject`.
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, AuthError> {
        let issued_at = self.clock.now().timestamp();
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: issued_at,
            exp: issued_at + self.validity.num_seconds(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(ALGORITHM), &claims, self.key.encoding())
            .map_err(|e| AuthError::Internal(format!("encode token: {e}")))?;

        Ok(IssuedToken { token, claims })
    }

    /// Verify a token and return its claims unchanged.
    ///
    /// Accepts `&str` or `Option<&str>`; `None` and empty input are rejected
    /// with `MissingToken`.
    pub fn verify<'a>(&self, token: impl Into<Option<&'a str>>) -> Result<TokenClaims, AuthError> {
        let token = match token.into().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return Err(AuthError::MissingToken),
        };

        let data = decode::<TokenClaims>(token, self.key.decoding(), &self.validation)
            .map_err(map_decode_error)?;
        let claims = data.claims;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::MissingRequiredClaim(_) => AuthError::MalformedToken,
        _ => AuthError::Internal(format!("verify token: {err}")),
    }
}
