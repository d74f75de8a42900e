//! Error types for the token layer.
//!
//! Like every crate in Pitchside, this one has its own error enum. A
//! `TokenError` always means "the bytes of a token were wrong", never
//! "the user is not allowed in". Authorization decisions are made higher up.

/// Errors that can occur while building or reading token segments.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Serializing a header or claims value to JSON failed.
    #[error("segment encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The segment is not valid unpadded base64url.
    #[error("segment is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not JSON of the expected shape.
    ///
    /// Covers malformed JSON, missing fields, and wrong field types.
    #[error("segment is not the expected JSON structure: {0}")]
    MalformedSegment(#[source] serde_json::Error),

    /// The server secret was empty. An empty HMAC key would let anyone
    /// forge tokens, so it is refused outright.
    #[error("server secret must not be empty")]
    EmptySecret,
}
