//! `Set-Cookie` construction and `Cookie` header parsing.

use std::fmt;

use crate::TransportError;

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE: &str = "session";

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// The `SameSite` attribute of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    /// Only sent on same-site requests.
    Strict,
    /// Also sent on top-level navigations from other sites. Needed for the
    /// session cookie, which is set on the redirect back from the identity
    /// provider.
    #[default]
    Lax,
    /// Sent on all requests (requires `Secure` in browsers).
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        })
    }
}

/// Attributes rendered after `name=value` in a `Set-Cookie` header.
///
/// The defaults are the session cookie's: one day, whole site, hidden from
/// page scripts, HTTPS only, first-party navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    /// `Max-Age` in seconds. `0` tells the browser to drop the cookie now.
    pub max_age_secs: u64,

    /// `Path`. `/` sends the cookie with every request to the origin.
    pub path: String,

    /// `HttpOnly`: not readable from `document.cookie`.
    pub http_only: bool,

    /// `Secure`: only sent over HTTPS.
    pub secure: bool,

    /// `SameSite`, or `None` to omit the attribute.
    pub same_site: Option<SameSite>,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            max_age_secs: 86_400,
            path: "/".to_string(),
            http_only: true,
            secure: true,
            same_site: Some(SameSite::Lax),
        }
    }
}

impl CookieAttributes {
    /// Session-style attributes with the given lifetime.
    pub fn with_max_age(max_age_secs: u64) -> Self {
        Self {
            max_age_secs,
            ..Self::default()
        }
    }

    /// Just enough to make the browser drop a cookie: `Max-Age=0; Path=/`.
    pub fn removal() -> Self {
        Self {
            max_age_secs: 0,
            path: "/".to_string(),
            http_only: false,
            secure: false,
            same_site: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SetCookie
// ---------------------------------------------------------------------------

/// A validated `Set-Cookie` header value.
///
/// Construction checks the name and value against RFC 6265, so every
/// `SetCookie` renders to a header a browser will accept as-is. Use
/// `to_string()` (via `Display`) to get the header value.
///
/// # Example
///
/// ```rust
/// use pitchside_transport::{CookieAttributes, SetCookie};
///
/// let cookie = SetCookie::new("theme", "dark", CookieAttributes::removal()).unwrap();
/// assert_eq!(cookie.to_string(), "theme=dark; Max-Age=0; Path=/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    name: String,
    value: String,
    attributes: CookieAttributes,
}

impl SetCookie {
    /// Builds a cookie, validating every part that lands in the header.
    ///
    /// # Errors
    /// - [`TransportError::InvalidName`] — empty name or non-token characters
    /// - [`TransportError::InvalidValue`] — characters outside `cookie-octet`
    /// - [`TransportError::InvalidPath`] — `;` or control characters in `Path`
    pub fn new(
        name: &str,
        value: &str,
        attributes: CookieAttributes,
    ) -> Result<Self, TransportError> {
        if name.is_empty() || !name.bytes().all(is_token_byte) {
            return Err(TransportError::InvalidName(name.to_string()));
        }
        // The value is deliberately left out of the error: it's usually a
        // session token.
        if !value.bytes().all(is_cookie_octet) {
            return Err(TransportError::InvalidValue(name.to_string()));
        }
        if attributes
            .path
            .bytes()
            .any(|b| b == b';' || b.is_ascii_control())
        {
            return Err(TransportError::InvalidPath(attributes.path));
        }
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
            attributes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn attributes(&self) -> &CookieAttributes {
        &self.attributes
    }
}

/// Renders `name=value; Max-Age=..; Path=..[; HttpOnly][; Secure][; SameSite=..]`.
impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attrs = &self.attributes;
        write!(
            f,
            "{}={}; Max-Age={}; Path={}",
            self.name, self.value, attrs.max_age_secs, attrs.path
        )?;
        if attrs.http_only {
            f.write_str("; HttpOnly")?;
        }
        if attrs.secure {
            f.write_str("; Secure")?;
        }
        if let Some(same_site) = attrs.same_site {
            write!(f, "; SameSite={same_site}")?;
        }
        Ok(())
    }
}

/// The cookie set on login:
/// `session=<token>; Max-Age=<max_age>; Path=/; HttpOnly; Secure; SameSite=Lax`.
///
/// # Errors
/// Returns [`TransportError::InvalidValue`] if `token` isn't cookie-safe.
/// Tokens from the session issuer are base64url and `.`, which always are.
pub fn session_cookie(
    token: &str,
    max_age_secs: u64,
) -> Result<SetCookie, TransportError> {
    SetCookie::new(
        SESSION_COOKIE,
        token,
        CookieAttributes::with_max_age(max_age_secs),
    )
}

/// The cookie set on logout: `session=; Max-Age=0; Path=/`.
///
/// This only asks the browser to forget the token. A copy of the token
/// captured elsewhere stays valid until its `exp`.
pub fn logout_cookie() -> SetCookie {
    SetCookie {
        name: SESSION_COOKIE.to_string(),
        value: String::new(),
        attributes: CookieAttributes::removal(),
    }
}

/// A removal cookie for any name: `<name>=; Max-Age=0; Path=/`.
pub fn removal_cookie(name: &str) -> Result<SetCookie, TransportError> {
    SetCookie::new(name, "", CookieAttributes::removal())
}

// ---------------------------------------------------------------------------
// Cookie header parsing
// ---------------------------------------------------------------------------

/// Finds the value of cookie `name` in a `Cookie` request header.
///
/// Pairs are separated by `;`, surrounding whitespace is ignored, and the
/// other cookies can appear in any order. A value wrapped in double quotes
/// is returned without them. Empty values count as absent, and the first
/// non-empty match wins.
///
/// The header is read as raw bytes. Only the matching pair has to be valid
/// UTF-8, so a neighbouring cookie with a non-ASCII value does not hide
/// the one being looked for. Pairs without `=` are skipped rather than
/// failing the whole header.
pub fn extract_cookie<'a, H>(header: &'a H, name: &str) -> Option<&'a str>
where
    H: AsRef<[u8]> + ?Sized,
{
    header
        .as_ref()
        .split(|&b| b == b';')
        .filter_map(|pair| {
            let eq = pair.iter().position(|&b| b == b'=')?;
            Some((&pair[..eq], &pair[eq + 1..]))
        })
        .filter(|(key, _)| key.trim_ascii() == name.as_bytes())
        .filter_map(|(_, value)| std::str::from_utf8(value.trim_ascii()).ok())
        .map(unquote)
        .find(|value| !value.is_empty())
}

/// Finds the session token across one or more `Cookie` header values.
///
/// HTTP/2 clients may split cookies over several header fields, so every
/// value is searched in order. Values may be `&str` or raw `&[u8]`.
pub fn extract_session<'a, I, H>(headers: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a H>,
    H: AsRef<[u8]> + ?Sized + 'a,
{
    headers
        .into_iter()
        .find_map(|header| extract_cookie(header, SESSION_COOKIE))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// RFC 7230 `tchar`: visible ASCII minus separators.
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
}

/// RFC 6265 `cookie-octet`.
fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Set-Cookie rendering
    // =====================================================================

    #[test]
    fn test_session_cookie_renders_wire_format() {
        let cookie = session_cookie("aaa.bbb.ccc", 86_400).unwrap();
        assert_eq!(
            cookie.to_string(),
            "session=aaa.bbb.ccc; Max-Age=86400; Path=/; HttpOnly; Secure; SameSite=Lax"
        );
    }

    #[test]
    fn test_logout_cookie_renders_wire_format() {
        assert_eq!(logout_cookie().to_string(), "session=; Max-Age=0; Path=/");
    }

    #[test]
    fn test_removal_cookie_uses_given_name() {
        let cookie = removal_cookie("oauth_state").unwrap();
        assert_eq!(cookie.to_string(), "oauth_state=; Max-Age=0; Path=/");
    }

    #[test]
    fn test_set_cookie_renders_strict_same_site() {
        let attrs = CookieAttributes {
            same_site: Some(SameSite::Strict),
            ..CookieAttributes::with_max_age(600)
        };
        let cookie = SetCookie::new("n", "v", attrs).unwrap();
        assert_eq!(
            cookie.to_string(),
            "n=v; Max-Age=600; Path=/; HttpOnly; Secure; SameSite=Strict"
        );
    }

    #[test]
    fn test_set_cookie_rejects_semicolon_in_value() {
        let result = SetCookie::new("session", "a;b", CookieAttributes::default());
        assert_eq!(
            result,
            Err(TransportError::InvalidValue("session".into()))
        );
    }

    #[test]
    fn test_set_cookie_rejects_whitespace_and_quotes_in_value() {
        for bad in ["a b", "a\"b", "a,b", "a\\b", "a\tb", "é"] {
            assert!(
                SetCookie::new("n", bad, CookieAttributes::default()).is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_set_cookie_accepts_base64url_token_characters() {
        let token = "eyJhbGci-_.AZaz09.xyz-_";
        assert!(SetCookie::new("session", token, CookieAttributes::default()).is_ok());
    }

    #[test]
    fn test_set_cookie_rejects_bad_names() {
        for bad in ["", "a b", "a=b", "a;b", "a\"b"] {
            assert!(matches!(
                SetCookie::new(bad, "v", CookieAttributes::default()),
                Err(TransportError::InvalidName(_))
            ));
        }
    }

    #[test]
    fn test_set_cookie_rejects_semicolon_in_path() {
        let attrs = CookieAttributes {
            path: "/; Domain=evil".into(),
            ..CookieAttributes::default()
        };
        assert!(matches!(
            SetCookie::new("n", "v", attrs),
            Err(TransportError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_invalid_value_error_does_not_echo_value() {
        let err = SetCookie::new("session", "secret token", CookieAttributes::default())
            .unwrap_err();
        assert!(!err.to_string().contains("secret token"));
    }

    // =====================================================================
    // Cookie header parsing
    // =====================================================================

    #[test]
    fn test_extract_cookie_between_other_cookies() {
        let header = "other=1; session=tok.en.sig; another=2";
        assert_eq!(extract_cookie(header, "session"), Some("tok.en.sig"));
    }

    #[test]
    fn test_extract_cookie_first_and_last_positions() {
        assert_eq!(extract_cookie("session=x; a=1", "session"), Some("x"));
        assert_eq!(extract_cookie("a=1; session=x", "session"), Some("x"));
        assert_eq!(extract_cookie("session=x", "session"), Some("x"));
    }

    #[test]
    fn test_extract_cookie_tolerates_irregular_whitespace() {
        let header = "  a=1 ;session=x  ;b=2";
        assert_eq!(extract_cookie(header, "session"), Some("x"));
    }

    #[test]
    fn test_extract_cookie_absent_returns_none() {
        assert_eq!(extract_cookie("a=1; b=2", "session"), None);
        assert_eq!(extract_cookie("", "session"), None);
    }

    #[test]
    fn test_extract_cookie_does_not_match_name_prefix_or_suffix() {
        let header = "session_id=nope; mysession=nope; sessions=nope";
        assert_eq!(extract_cookie(header, "session"), None);
    }

    #[test]
    fn test_extract_cookie_empty_value_is_absent() {
        assert_eq!(extract_cookie("session=; a=1", "session"), None);
    }

    #[test]
    fn test_extract_cookie_skips_empty_then_finds_later_value() {
        assert_eq!(extract_cookie("session=; session=x", "session"), Some("x"));
    }

    #[test]
    fn test_extract_cookie_strips_double_quotes() {
        assert_eq!(extract_cookie("session=\"x.y.z\"", "session"), Some("x.y.z"));
    }

    #[test]
    fn test_extract_cookie_skips_pairs_without_equals() {
        assert_eq!(extract_cookie("garbage; session=x", "session"), Some("x"));
    }

    #[test]
    fn test_extract_cookie_keeps_equals_inside_value() {
        assert_eq!(extract_cookie("session=a=b", "session"), Some("a=b"));
    }

    #[test]
    fn test_extract_cookie_ignores_utf8_neighbour() {
        assert_eq!(extract_cookie("pref=café; session=x", "session"), Some("x"));
    }

    #[test]
    fn test_extract_cookie_ignores_non_utf8_neighbour() {
        let header: &[u8] = b"pref=caf\xe9; session=x";
        assert_eq!(extract_cookie(header, "session"), Some("x"));
    }

    #[test]
    fn test_extract_cookie_non_utf8_target_is_absent() {
        let header: &[u8] = b"session=\xff\xfe";
        assert_eq!(extract_cookie(header, "session"), None);
    }

    #[test]
    fn test_extract_session_searches_all_headers() {
        let headers = ["a=1", "b=2; session=x"];
        assert_eq!(extract_session(headers), Some("x"));
    }

    #[test]
    fn test_extract_session_no_headers_returns_none() {
        assert_eq!(extract_session(std::iter::empty::<&str>()), None);
    }
}
