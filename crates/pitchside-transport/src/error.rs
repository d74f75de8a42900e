/// Errors that can occur in the cookie transport layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The cookie name is empty or contains characters outside an RFC 6265
    /// token (separators, whitespace, control characters).
    #[error("invalid cookie name: {0:?}")]
    InvalidName(String),

    /// The cookie value contains characters that can't appear in a
    /// `Set-Cookie` header without quoting (`;`, `,`, `"`, `\`, whitespace,
    /// control characters, non-ASCII).
    #[error("invalid cookie value for {0}")]
    InvalidValue(String),

    /// The `Path` attribute contains `;` or control characters.
    #[error("invalid cookie path: {0:?}")]
    InvalidPath(String),
}
