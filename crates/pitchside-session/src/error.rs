//! Error types for the session layer.

/// Why a presented token was turned away.
///
/// These reasons are for server-side diagnostics only. Everything that
/// faces a client collapses them into a single "unauthorized", so an
/// attacker can't tell a bad signature from an expired token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The token doesn't have exactly three non-empty `.`-separated parts.
    #[error("malformed token")]
    MalformedToken,

    /// The signature doesn't match the header and payload. Covers forged,
    /// truncated, tampered, and wrong-secret tokens alike.
    #[error("bad signature")]
    BadSignature,

    /// The signature was fine but the payload isn't a claims structure.
    #[error("malformed payload")]
    MalformedPayload,

    /// The token's `exp` has passed.
    #[error("token expired")]
    Expired,
}

impl Rejection {
    /// A short stable label, used as a `tracing` field value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedToken => "malformed_token",
            Self::BadSignature => "bad_signature",
            Self::MalformedPayload => "malformed_payload",
            Self::Expired => "expired",
        }
    }
}

/// Errors from the login side of the session layer.
///
/// These cover the steps that happen before a token exists: asking the
/// identity provider who the user is, checking the allow-list, and
/// building the token itself.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The identity provider couldn't complete the code exchange.
    #[error("identity provider exchange failed: {0}")]
    Provider(String),

    /// The admin directory lookup failed (not "not found" but "couldn't
    /// ask"; a missing admin is `Ok(false)` from the directory).
    #[error("admin directory lookup failed: {0}")]
    Directory(String),

    /// The verified user isn't on the admin allow-list.
    #[error("{0} is not an administrator")]
    NotAdmin(String),

    /// A presented token failed validation.
    #[error("session rejected: {0}")]
    Rejected(#[from] Rejection),

    /// Building the token failed.
    #[error(transparent)]
    Token(#[from] pitchside_token::TokenError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_converts_into_session_error() {
        let err: SessionError = Rejection::Expired.into();
        assert!(matches!(err, SessionError::Rejected(Rejection::Expired)));
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_rejection_labels_are_distinct() {
        let labels = [
            Rejection::MalformedToken.as_str(),
            Rejection::BadSignature.as_str(),
            Rejection::MalformedPayload.as_str(),
            Rejection::Expired.as_str(),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_not_admin_message_names_email() {
        let err = SessionError::NotAdmin("x@y.com".into());
        assert_eq!(err.to_string(), "x@y.com is not an administrator");
    }
}
