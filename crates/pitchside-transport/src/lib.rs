//! Cookie transport layer for Pitchside.
//!
//! A session token travels between the server and the browser in a cookie
//! called `session`. This crate builds the `Set-Cookie` headers that plant
//! and remove it, and reads it back out of inbound `Cookie` headers.
//!
//! It is plain string handling: no HTTP types, no I/O. The server layer
//! feeds it header values and writes its output to responses.
//!
//! # Wire format
//!
//! ```text
//! Set-Cookie: session=<token>; Max-Age=86400; Path=/; HttpOnly; Secure; SameSite=Lax
//! Set-Cookie: session=; Max-Age=0; Path=/
//! Cookie:     other=1; session=<token>; another=2
//! ```

mod cookie;
mod error;

pub use cookie::{
    extract_cookie, extract_session, logout_cookie, removal_cookie,
    session_cookie, CookieAttributes, SameSite, SetCookie, SESSION_COOKIE,
};
pub use error::TransportError;
