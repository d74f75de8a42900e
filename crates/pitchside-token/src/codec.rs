//! Segment codec: JSON values ⇄ URL-safe base64 strings.
//!
//! Each of the three parts of a token is a "segment". The first two are
//! JSON documents run through base64url; the third is raw signature bytes
//! run through the same alphabet.
//!
//! The alphabet is the URL-safe one (`-` and `_` instead of `+` and `/`)
//! and padding is never written. Segments are safe to drop straight into a
//! cookie value or a URL without further escaping.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::GeneralPurpose;
use base64::Engine;
use serde::{de::DeserializeOwned, Serialize};

use crate::TokenError;

/// The base64 engine shared by every segment of a token.
///
/// Unpadded on encode, and strict on decode: padded input and non-zero
/// trailing bits are rejected, so each byte string has exactly one
/// accepted spelling.
const SEGMENT_ENGINE: GeneralPurpose = URL_SAFE_NO_PAD;

/// Serializes `value` to JSON and encodes it as a base64url segment.
///
/// The output is deterministic for a given value: the same struct always
/// produces the same segment, which is what makes re-signing reproducible.
///
/// # Errors
/// Returns [`TokenError::Encode`] if `value` cannot be represented as JSON
/// (for example, a map with non-string keys).
///
/// # Example
///
/// ```rust
/// use pitchside_token::{encode_segment, Header};
///
/// let segment = encode_segment(&Header::default()).unwrap();
/// assert_eq!(segment, "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9");
/// ```
pub fn encode_segment<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value).map_err(TokenError::Encode)?;
    Ok(SEGMENT_ENGINE.encode(json))
}

/// Decodes a base64url segment and parses it as `T`.
///
/// # Errors
/// - [`TokenError::Base64`] — the segment uses characters outside the
///   URL-safe alphabet, carries padding, or has an impossible length.
/// - [`TokenError::MalformedSegment`] — the bytes are not JSON, or the JSON
///   doesn't match `T`.
///
/// Callers must treat both as "invalid token". Neither is ever shown to
/// the end user.
pub fn decode_segment<T: DeserializeOwned>(
    segment: &str,
) -> Result<T, TokenError> {
    let bytes = decode_bytes(segment)?;
    serde_json::from_slice(&bytes).map_err(TokenError::MalformedSegment)
}

/// Encodes raw bytes (a signature) as a base64url segment.
pub fn encode_bytes(bytes: &[u8]) -> String {
    SEGMENT_ENGINE.encode(bytes)
}

/// Decodes a base64url segment back to raw bytes.
///
/// # Errors
/// Returns [`TokenError::Base64`] for invalid characters, padding, an
/// impossible length, or non-zero trailing bits.
pub fn decode_bytes(segment: &str) -> Result<Vec<u8>, TokenError> {
    Ok(SEGMENT_ENGINE.decode(segment)?)
}
