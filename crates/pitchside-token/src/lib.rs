//! Session token format for Pitchside.
//!
//! This crate defines the compact signed token that carries an admin's
//! session between the server and the browser:
//!
//! - **Types** ([`Header`], [`Claims`], [`Identity`]) — what a token says.
//! - **Codec** ([`encode_segment`], [`decode_segment`], [`encode_bytes`],
//!   [`decode_bytes`]) — how each part is turned into a URL-safe string
//!   segment and back.
//! - **Signer** ([`ServerSecret`], [`sign`], [`verify`]) — how the first two
//!   segments are bound to the server's secret with HMAC-SHA256.
//! - **Errors** ([`TokenError`]) — what can go wrong along the way.
//!
//! # Wire format
//!
//! ```text
//! base64url(header JSON) . base64url(claims JSON) . base64url(HMAC-SHA256)
//! ```
//!
//! The crate knows nothing about expiry policy, cookies, or HTTP. Those
//! live in the session and transport layers above it.

mod codec;
mod error;
mod signer;
mod types;

pub use codec::{decode_bytes, decode_segment, encode_bytes, encode_segment};
pub use error::TokenError;
pub use signer::{sign, verify, ServerSecret};
pub use types::{Claims, Header, Identity};
