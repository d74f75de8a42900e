//! Login seams: identity providers and the admin allow-list.
//!
//! Pitchside doesn't talk to Google (or any other OAuth provider) itself,
//! and it doesn't own the table of club administrators. Both are external
//! collaborators, expressed as traits:
//!
//! - [`IdentityProvider`] — runs the redirect-based login and reports back
//!   a verified `{email, name}`.
//! - [`AdminDirectory`] — answers "is this email an administrator?".
//!
//! The server calls the provider during the OAuth callback, checks the
//! directory once, and only then asks the [`SessionIssuer`] for a token.
//! After that neither is consulted again for the life of the session.
//!
//! [`SessionIssuer`]: crate::SessionIssuer

use std::collections::HashSet;

use pitchside_token::Identity;

use crate::SessionError;

/// An external identity provider reached through a redirect exchange.
///
/// # Trait bounds
///
/// - `Send + Sync` → one provider is shared by every request handler task.
/// - `'static` → it lives as long as the server.
///
/// # Example
///
/// ```rust
/// use pitchside_session::{Identity, IdentityProvider, SessionError};
///
/// /// Treats the code as an email. Development only!
/// struct DevProvider;
///
/// impl IdentityProvider for DevProvider {
///     fn authorize_url(&self, state: &str) -> String {
///         format!("/dev-login?state={state}")
///     }
///
///     async fn exchange(&self, code: &str) -> Result<Identity, SessionError> {
///         if code.contains('@') {
///             Ok(Identity::new(code, code))
///         } else {
///             Err(SessionError::Provider("code must be an email".into()))
///         }
///     }
/// }
/// ```
pub trait IdentityProvider: Send + Sync + 'static {
    /// Where to send the browser to start a login.
    ///
    /// `state` is an opaque nonce the provider must hand back unchanged on
    /// the callback. The server checks it against a cookie to tie the
    /// callback to the browser that started the login.
    fn authorize_url(&self, state: &str) -> String;

    /// Exchanges the callback's authorization `code` for a verified identity.
    ///
    /// # Returns
    /// - `Ok(Identity)` — the provider vouches for this email
    /// - `Err(SessionError::Provider)` — the code was bad or the provider
    ///   couldn't be reached
    fn exchange(
        &self,
        code: &str,
    ) -> impl std::future::Future<Output = Result<Identity, SessionError>> + Send;
}

/// The allow-list of administrators.
///
/// Consulted exactly once per login, before a token is issued. A `false`
/// answer means "not an admin"; an `Err` means the lookup itself failed.
pub trait AdminDirectory: Send + Sync + 'static {
    fn is_admin(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<bool, SessionError>> + Send;
}

/// An in-memory [`AdminDirectory`] built from a fixed set of emails.
///
/// Matching is exact (case-sensitive), the same as a keyed lookup in the
/// club's admin table.
#[derive(Debug, Clone, Default)]
pub struct StaticAllowList {
    emails: HashSet<String>,
}

impl StaticAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            emails: emails.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

impl AdminDirectory for StaticAllowList {
    async fn is_admin(&self, email: &str) -> Result<bool, SessionError> {
        Ok(self.emails.contains(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_allow_list_known_email_is_admin() {
        let list = StaticAllowList::new(["coach@club.example"]);
        assert!(list.is_admin("coach@club.example").await.unwrap());
    }

    #[tokio::test]
    async fn test_static_allow_list_unknown_email_is_not_admin() {
        let list = StaticAllowList::new(["coach@club.example"]);
        assert!(!list.is_admin("fan@club.example").await.unwrap());
    }

    #[tokio::test]
    async fn test_static_allow_list_matching_is_case_sensitive() {
        let list = StaticAllowList::new(["coach@club.example"]);
        assert!(!list.is_admin("Coach@club.example").await.unwrap());
    }

    #[tokio::test]
    async fn test_static_allow_list_empty_admits_nobody() {
        let list = StaticAllowList::default();
        assert!(list.is_empty());
        assert!(!list.is_admin("").await.unwrap());
    }

    #[test]
    fn test_static_allow_list_deduplicates() {
        let list = StaticAllowList::new(["a@b.com", "a@b.com", "c@d.com"]);
        assert_eq!(list.len(), 2);
    }
}
