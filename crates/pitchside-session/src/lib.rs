//! Admin session management for Pitchside.
//!
//! This crate handles the life of an admin session:
//!
//! 1. **Login seams** — who the user is ([`IdentityProvider`]) and whether
//!    they're allowed in ([`AdminDirectory`])
//! 2. **Issuance** — turning a verified identity into a signed token
//!    ([`SessionIssuer`])
//! 3. **Validation** — checking a presented token on every protected
//!    request ([`SessionValidator`])
//!
//! There is no session table. A token is valid purely because of its
//! signature and its expiry, so validation needs nothing but the token,
//! the clock, and the secret.
//!
//! # How it fits in the stack
//!
//! ```text
//! Server Layer (above)   ← guards endpoints, runs the login redirects
//!     ↕
//! Session Layer (this crate)  ← issues and validates session tokens
//!     ↕
//! Token Layer (below)    ← segment codec, HMAC signer, claims types
//! ```

mod auth;
mod config;
mod error;
mod issuer;
mod validator;

pub use auth::{AdminDirectory, IdentityProvider, StaticAllowList};
pub use config::{unix_now, SessionConfig};
pub use error::{Rejection, SessionError};
pub use issuer::SessionIssuer;
pub use validator::SessionValidator;

// Re-exported so callers don't need a direct dependency on the token crate
// for the types that cross this layer's API.
pub use pitchside_token::{Identity, ServerSecret};
