//! Session validation: the check that runs on every protected request.
//!
//! Validation is a short state machine. Each step either moves on or
//! rejects with a reason:
//!
//! ```text
//! RECEIVED ──split──→ SEGMENTED ──verify──→ SIGNATURE_OK ──decode──→ PAYLOAD_OK ──exp──→ VALID
//!     │                   │                      │                       │
//!     ▼                   ▼                      ▼                       ▼
//! MalformedToken     BadSignature         MalformedPayload            Expired
//! ```
//!
//! The signature is checked BEFORE the payload is decoded. A tampered
//! payload therefore fails as `BadSignature`, and attacker-controlled JSON
//! is never parsed unless it was signed with our secret.

use pitchside_token::{
    decode_bytes, decode_segment, verify, Claims, Identity, ServerSecret,
};

use crate::{unix_now, Rejection};

/// Checks session tokens against the server secret and the clock.
///
/// Holds only the (immutable) secret, so it can be cloned into every
/// request handler and used concurrently without locking.
#[derive(Debug, Clone)]
pub struct SessionValidator {
    secret: ServerSecret,
}

impl SessionValidator {
    pub fn new(secret: ServerSecret) -> Self {
        Self { secret }
    }

    /// Validates `token` as of `now` (Unix seconds).
    ///
    /// # Returns
    /// - `Ok(Identity)` — the token is authentic and unexpired
    /// - `Err(Rejection)` — why it isn't. Callers must not show the reason
    ///   to the client.
    pub fn validate(&self, token: &str, now: u64) -> Result<Identity, Rejection> {
        // RECEIVED → SEGMENTED
        let (header, payload, signature) =
            split_segments(token).ok_or(Rejection::MalformedToken)?;

        // SEGMENTED → SIGNATURE_OK
        //
        // A signature segment that isn't even base64url can't match, so it
        // is a bad signature rather than a malformed token.
        let signature =
            decode_bytes(signature).map_err(|_| Rejection::BadSignature)?;
        let signing_input = &token[..header.len() + 1 + payload.len()];
        if !verify(signing_input, &signature, &self.secret) {
            return Err(Rejection::BadSignature);
        }

        // SIGNATURE_OK → PAYLOAD_OK
        let claims: Claims =
            decode_segment(payload).map_err(|_| Rejection::MalformedPayload)?;

        // PAYLOAD_OK → VALID
        if claims.is_expired_at(now) {
            return Err(Rejection::Expired);
        }

        Ok(claims.into_identity())
    }

    /// Validates `token` against the system clock.
    pub fn validate_now(&self, token: &str) -> Result<Identity, Rejection> {
        self.validate(token, unix_now())
    }
}

/// Splits `token` into exactly three non-empty `.`-separated segments.
fn split_segments(token: &str) -> Option<(&str, &str, &str)> {
    let mut parts = token.split('.');
    let header = parts.next()?;
    let payload = parts.next()?;
    let signature = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    if header.is_empty() || payload.is_empty() || signature.is_empty() {
        return None;
    }
    Some((header, payload, signature))
}

// =========================================================================
// Tests
// =========================================================================
