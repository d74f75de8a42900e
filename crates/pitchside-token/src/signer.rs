//! HMAC-SHA256 signing and verification.
//!
//! The signature is what makes a token trustworthy: it proves the first
//! two segments were produced by someone holding the server secret. Anyone
//! who has the secret can mint arbitrary claims, so the secret type below
//! is deliberately hard to leak by accident.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// The process-wide signing key.
///
/// Holds an HMAC state already keyed with the secret, so signing doesn't
/// re-derive the key each time. Cloning is cheap and every clone signs
/// identically.
///
/// There is no `Display` impl and `Debug` prints a placeholder: a
/// `tracing::debug!(?config)` can never write the secret to a log.
#[derive(Clone)]
pub struct ServerSecret {
    mac: HmacSha256,
}

impl ServerSecret {
    /// Creates a signing key from raw secret bytes.
    ///
    /// A string secret is used through its UTF-8 bytes
    /// (`ServerSecret::new("s3cret")`).
    ///
    /// # Errors
    /// Returns [`TokenError::EmptySecret`] if `secret` is empty.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        // HMAC takes keys of any length (long keys are hashed first), so
        // `new_from_slice` only fails for fixed-size MACs. Map it anyway
        // rather than panicking.
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|_| TokenError::EmptySecret)?;
        Ok(Self { mac })
    }
}

impl fmt::Debug for ServerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServerSecret(<redacted>)")
    }
}

/// Computes HMAC-SHA256 of `message` under `secret`.
///
/// Deterministic: the same message and secret always give the same 32
/// bytes.
pub fn sign(message: &str, secret: &ServerSecret) -> Vec<u8> {
    let mut mac = secret.mac.clone();
    mac.update(message.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Checks that `signature` is the HMAC-SHA256 of `message` under `secret`.
///
/// The comparison is constant-time (via `Mac::verify_slice`), so timing
/// doesn't reveal how many leading bytes of a forged signature were right.
/// A signature of the wrong length is simply `false`.
pub fn verify(message: &str, signature: &[u8], secret: &ServerSecret) -> bool {
    let mut mac = secret.mac.clone();
    mac.update(message.as_bytes());
    mac.verify_slice(signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> ServerSecret {
        ServerSecret::new(s).expect("non-empty secret")
    }

    #[test]
    fn test_new_empty_secret_is_refused() {
        assert!(matches!(
            ServerSecret::new(""),
            Err(TokenError::EmptySecret)
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let s = secret("hunter2");
        let printed = format!("{s:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("redacted"));
    }

    #[test]
    fn test_sign_matches_rfc4231_vector() {
        // RFC 4231 test case 2: key "Jefe".
        let sig = sign("what do ya want for nothing?", &secret("Jefe"));
        let hex: String = sig.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(
            hex,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_sign_is_deterministic_and_32_bytes() {
        let s = secret("k");
        let a = sign("header.payload", &s);
        let b = sign("header.payload", &s);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_sign_clones_share_the_key() {
        let s = secret("k");
        let copy = s.clone();
        assert_eq!(sign("m", &s), sign("m", &copy));
    }

    #[test]
    fn test_verify_accepts_own_signature() {
        let s = secret("k");
        let sig = sign("m", &s);
        assert!(verify("m", &sig, &s));
    }

    #[test]
    fn test_verify_rejects_other_message() {
        let s = secret("k");
        let sig = sign("m", &s);
        assert!(!verify("n", &sig, &s));
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let sig = sign("m", &secret("one"));
        assert!(!verify("m", &sig, &secret("two")));
    }

    #[test]
    fn test_verify_rejects_truncated_signature() {
        let s = secret("k");
        let sig = sign("m", &s);
        assert!(!verify("m", &sig[..31], &s));
        assert!(!verify("m", &[], &s));
    }
}
