//! The data carried inside a session token.
//!
//! A token has three parts. The first two are defined here:
//!   - [`Header`] — a fixed algorithm/type descriptor.
//!   - [`Claims`] — who the admin is and when the session ends.
//!
//! [`Identity`] is the `{email, name}` pair that goes in (at login) and
//! comes out (on every validated request). It's the only piece of a token
//! that protected endpoints ever see.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// The token header: `{"alg":"HS256","typ":"JWT"}`.
///
/// Every token issued by Pitchside carries this exact header. Field order
/// matters for the encoded form (serde writes struct fields in declaration
/// order), and the encoded form is what gets signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signature algorithm. Always `"HS256"`.
    pub alg: String,
    /// Token type. Always `"JWT"`.
    pub typ: String,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

/// The token payload.
///
/// Unknown fields are ignored on decode. Missing fields make the payload
/// malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The admin's email address. Their unique identifier.
    pub email: String,

    /// Display name. Informational only; never used to authorize.
    pub name: String,

    /// Absolute expiry in seconds since the Unix epoch.
    ///
    /// A token is expired once `now >= exp`.
    pub exp: u64,
}

impl Claims {
    /// Builds claims for `identity` that expire `lifetime_secs` after `now`.
    pub fn new(identity: &Identity, now: u64, lifetime_secs: u64) -> Self {
        Self {
            email: identity.email.clone(),
            name: identity.name.clone(),
            exp: now.saturating_add(lifetime_secs),
        }
    }

    /// Returns `true` if these claims are past their expiry at `now`.
    ///
    /// The boundary is exclusive: at exactly `now == exp` the token is
    /// already expired.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.exp
    }

    /// Drops the expiry and returns just the identity.
    pub fn into_identity(self) -> Identity {
        Identity {
            email: self.email,
            name: self.name,
        }
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// An authenticated admin: the `{email, name}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub name: String,
}

impl Identity {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}

/// Logs as the email address, which is what an operator searches for.
impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}
