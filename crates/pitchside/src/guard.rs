//! The protected-endpoint guard.
//!
//! Every sensitive API operation runs behind the same check:
//!   1. Find the `session` cookie → none means unauthorized
//!   2. Validate the token → any rejection means unauthorized
//!   3. Hand `{email, name}` to the operation
//!
//! The guard only reads. It never touches request or session state, so it
//! is safe to run on every request in parallel.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use pitchside_session::{unix_now, Identity, SessionValidator};
use pitchside_transport::{extract_cookie, extract_session};

use crate::PitchsideError;

/// Runs the guard over a request's headers at time `now`.
///
/// Every failure returns the same [`PitchsideError::Unauthorized`]. The
/// specific reason is logged at `debug` level only.
pub fn authorize(
    headers: &HeaderMap,
    validator: &SessionValidator,
    now: u64,
) -> Result<Identity, PitchsideError> {
    let Some(token) = extract_session(cookie_headers(headers)) else {
        tracing::debug!("request has no session cookie");
        return Err(PitchsideError::Unauthorized);
    };

    validator.validate(token, now).map_err(|reason| {
        tracing::debug!(reason = reason.as_str(), "session rejected");
        PitchsideError::Unauthorized
    })
}

/// Finds cookie `name` across all `Cookie` headers of a request.
pub(crate) fn request_cookie<'a>(
    headers: &'a HeaderMap,
    name: &str,
) -> Option<&'a str> {
    cookie_headers(headers).find_map(|h| extract_cookie(h, name))
}

/// Every `Cookie` header value as raw bytes, in order.
///
/// Browsers send script-set cookies with UTF-8 values, which `to_str`
/// would refuse for the whole header.
fn cookie_headers(headers: &HeaderMap) -> impl Iterator<Item = &[u8]> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .map(|value| value.as_bytes())
}

/// Extractor that admits only requests with a valid admin session.
///
/// Take it as a handler argument and the handler only runs for logged-in
/// admins; everyone else gets `401 {"error":"unauthorized"}`.
///
/// ```rust,ignore
/// async fn roster(AdminSession(admin): AdminSession) -> String {
///     format!("{} is viewing the roster", admin.name)
/// }
/// ```
///
/// The validator comes from the request extensions, which the Pitchside
/// router fills in for every route, including ones merged in with
/// [`PitchsideServerBuilder::routes`](crate::PitchsideServerBuilder::routes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession(pub Identity);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = PitchsideError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let validator = parts
            .extensions
            .get::<SessionValidator>()
            .ok_or(PitchsideError::MissingValidator)?;
        authorize(&parts.headers, validator, unix_now()).map(AdminSession)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use pitchside_session::{ServerSecret, SessionConfig, SessionIssuer};

    use super::*;

    const T: u64 = 1_700_000_000;

    fn pair() -> (SessionIssuer, SessionValidator) {
        let secret = ServerSecret::new("guard-secret").unwrap();
        (
            SessionIssuer::new(secret.clone(), SessionConfig::default()),
            SessionValidator::new(secret),
        )
    }

    fn headers_with(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for c in cookies {
            headers.append(header::COOKIE, HeaderValue::from_str(c).unwrap());
        }
        headers
    }

    #[test]
    fn test_authorize_valid_cookie_yields_identity() {
        let (issuer, validator) = pair();
        let token = issuer.issue(&Identity::new("a@b.com", "A"), T).unwrap();
        let headers = headers_with(&[&format!("other=1; session={token}; another=2")]);

        let who = authorize(&headers, &validator, T + 1).expect("authorized");
        assert_eq!(who, Identity::new("a@b.com", "A"));
    }

    #[test]
    fn test_authorize_no_cookie_header_is_unauthorized() {
        let (_, validator) = pair();
        let result = authorize(&HeaderMap::new(), &validator, T);
        assert!(matches!(result, Err(PitchsideError::Unauthorized)));
    }

    #[test]
    fn test_authorize_other_cookies_only_is_unauthorized() {
        let (_, validator) = pair();
        let headers = headers_with(&["theme=dark; lang=en"]);
        assert!(matches!(
            authorize(&headers, &validator, T),
            Err(PitchsideError::Unauthorized)
        ));
    }

    #[test]
    fn test_authorize_expired_token_is_unauthorized() {
        let (issuer, validator) = pair();
        let token = issuer.issue(&Identity::new("a@b.com", "A"), T).unwrap();
        let headers = headers_with(&[&format!("session={token}")]);
        assert!(matches!(
            authorize(&headers, &validator, T + 86_400),
            Err(PitchsideError::Unauthorized)
        ));
    }

    #[test]
    fn test_authorize_garbage_token_is_unauthorized() {
        let (_, validator) = pair();
        let headers = headers_with(&["session=not-a-token"]);
        assert!(matches!(
            authorize(&headers, &validator, T),
            Err(PitchsideError::Unauthorized)
        ));
    }

    #[test]
    fn test_authorize_searches_split_cookie_headers() {
        let (issuer, validator) = pair();
        let token = issuer.issue(&Identity::new("a@b.com", "A"), T).unwrap();
        let headers = headers_with(&["a=1", &format!("session={token}")]);
        assert!(authorize(&headers, &validator, T + 1).is_ok());
    }

    #[test]
    fn test_authorize_survives_non_ascii_neighbour_cookie() {
        let (issuer, validator) = pair();
        let token = issuer.issue(&Identity::new("a@b.com", "A"), T).unwrap();
        let raw = format!("pref=café; session={token}");
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_bytes(raw.as_bytes()).unwrap(),
        );

        let who = authorize(&headers, &validator, T + 1).expect("authorized");
        assert_eq!(who.email, "a@b.com");
    }

    #[test]
    fn test_authorize_survives_latin1_neighbour_cookie() {
        let (issuer, validator) = pair();
        let token = issuer.issue(&Identity::new("a@b.com", "A"), T).unwrap();
        let mut raw = b"pref=caf\xe9; session=".to_vec();
        raw.extend_from_slice(token.as_bytes());
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_bytes(&raw).unwrap());

        assert!(authorize(&headers, &validator, T + 1).is_ok());
    }

    #[test]
    fn test_request_cookie_finds_named_cookie() {
        let headers = headers_with(&["oauth_state=abc; session=x"]);
        assert_eq!(request_cookie(&headers, "oauth_state"), Some("abc"));
        assert_eq!(request_cookie(&headers, "missing"), None);
    }
}
