//! Session issuance: verified identity in, signed token out.

use pitchside_token::{
    encode_bytes, encode_segment, sign, Claims, Header, Identity, ServerSecret,
    TokenError,
};

use crate::{unix_now, SessionConfig};

/// Mints session tokens.
///
/// The issuer is a pure claims-to-token transform. It does NOT check the
/// admin allow-list; the caller must have done that already (see
/// [`AdminDirectory`](crate::AdminDirectory)). It stores nothing, so two
/// issuers with the same secret and config are interchangeable.
#[derive(Debug, Clone)]
pub struct SessionIssuer {
    secret: ServerSecret,
    config: SessionConfig,
}

impl SessionIssuer {
    /// Creates an issuer that signs with `secret`.
    pub fn new(secret: ServerSecret, config: SessionConfig) -> Self {
        Self { secret, config }
    }

    /// The configured session lifetime, in seconds.
    pub fn lifetime_secs(&self) -> u64 {
        self.config.lifetime_secs
    }

    /// Issues a token for `identity` that expires `lifetime_secs` after `now`.
    ///
    /// # Errors
    /// Returns [`TokenError::Encode`] only if JSON serialization fails.
    /// That can't happen for the fixed header and claims types, but it is
    /// propagated rather than assumed away.
    pub fn issue(
        &self,
        identity: &Identity,
        now: u64,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(identity, now, self.config.lifetime_secs);
        let token = self.issue_claims(&claims)?;
        tracing::info!(email = %identity, exp = claims.exp, "session issued");
        Ok(token)
    }

    /// Issues a token for `identity` using the system clock.
    pub fn issue_now(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue(identity, unix_now())
    }

    /// Signs `claims` exactly as given, `exp` included.
    ///
    /// This skips the lifetime policy. Tooling and tests use it when they
    /// need a token with a specific expiry.
    pub fn issue_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = encode_segment(&Header::default())?;
        let payload = encode_segment(claims)?;
        let signing_input = format!("{header}.{payload}");
        let signature = encode_bytes(&sign(&signing_input, &self.secret));
        Ok(format!("{signing_input}.{signature}"))
    }
}
