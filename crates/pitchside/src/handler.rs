//! HTTP handlers for the login flow.
//!
//! The flow is:
//!   1. `GET /auth/login` → plant a random `state` cookie, redirect to the
//!      identity provider
//!   2. `GET /auth/callback` → check `state`, exchange the code, check the
//!      allow-list, issue a session cookie, redirect into the admin area
//!   3. `GET|POST /auth/logout` → clear the session cookie
//!   4. `GET /api/auth/me` → who am I (guarded)

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;
use pitchside_session::{AdminDirectory, Identity, IdentityProvider, SessionError};
use pitchside_transport::{
    logout_cookie, removal_cookie, session_cookie, CookieAttributes, SetCookie,
};
use rand::Rng;
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::guard::request_cookie;
use crate::server::ServerState;
use crate::{AdminSession, PitchsideError};

/// Cookie that ties an OAuth callback to the browser that started it.
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// How long a login attempt may take before its `state` cookie lapses.
pub const OAUTH_STATE_MAX_AGE_SECS: u64 = 600;

/// Query parameters the identity provider appends to the callback URL.
#[derive(Debug, Deserialize)]
pub(crate) struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    /// Set instead of `code` when the user cancels or the provider refuses.
    error: Option<String>,
}

/// Starts a login: remembers a fresh `state` nonce and hands off to the
/// identity provider.
pub(crate) async fn login<P, D>(
    State(state): State<Arc<ServerState<P, D>>>,
) -> Result<Response, PitchsideError>
where
    P: IdentityProvider,
    D: AdminDirectory,
{
    let nonce = generate_state();
    let cookie = SetCookie::new(
        OAUTH_STATE_COOKIE,
        &nonce,
        CookieAttributes::with_max_age(OAUTH_STATE_MAX_AGE_SECS),
    )?;
    let location = location_header(&state.provider.authorize_url(&nonce))?;

    tracing::debug!("login started, redirecting to identity provider");
    Ok(see_other(location, [cookie.to_string()]))
}

/// Finishes a login. Only an allow-listed admin leaves with a session.
///
/// The `state` cookie is single-use: every response from here clears it,
/// whether the login succeeded or not.
pub(crate) async fn callback<P, D>(
    State(state): State<Arc<ServerState<P, D>>>,
    headers: HeaderMap,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Response
where
    P: IdentityProvider,
    D: AdminDirectory,
{
    let outcome = finish_login(&state, &headers, params).await;
    let clear_state = match removal_cookie(OAUTH_STATE_COOKIE) {
        Ok(cookie) => cookie.to_string(),
        Err(err) => return PitchsideError::from(err).into_response(),
    };

    match outcome {
        Ok((session, location)) => see_other(location, [session, clear_state]),
        Err(err) => ([(SET_COOKIE, clear_state)], err).into_response(),
    }
}

/// The callback checks, in order. Returns the session `Set-Cookie` value
/// and where to send the browser.
async fn finish_login<P, D>(
    state: &ServerState<P, D>,
    headers: &HeaderMap,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Result<(String, HeaderValue), PitchsideError>
where
    P: IdentityProvider,
    D: AdminDirectory,
{
    let Query(params) = params.map_err(|rejection| {
        tracing::debug!(%rejection, "unreadable login callback query");
        PitchsideError::BadRequest("malformed callback query".into())
    })?;

    if let Some(error) = params.error {
        tracing::info!(%error, "identity provider declined the login");
        return Err(PitchsideError::BadRequest("login was not completed".into()));
    }

    let (Some(code), Some(returned_state)) = (params.code, params.state) else {
        return Err(PitchsideError::BadRequest("missing code or state".into()));
    };

    // The state must round-trip through the provider unchanged AND match
    // the cookie this browser got from /auth/login.
    let state_matches = request_cookie(headers, OAUTH_STATE_COOKIE)
        .is_some_and(|expected| states_match(expected, &returned_state));
    if !state_matches {
        tracing::warn!("login callback with missing or mismatched state");
        return Err(PitchsideError::BadRequest("state mismatch".into()));
    }

    let identity = state.provider.exchange(&code).await?;

    // The one and only allow-list check. After this the token speaks for
    // itself until it expires.
    if !state.directory.is_admin(&identity.email).await? {
        tracing::warn!(email = %identity, "login refused, not an administrator");
        return Err(SessionError::NotAdmin(identity.email).into());
    }

    let token = state.issuer.issue_now(&identity)?;
    let session = session_cookie(&token, state.issuer.lifetime_secs())?;
    let location = location_header(&state.post_login_redirect)?;

    tracing::info!(email = %identity, "admin logged in");
    Ok((session.to_string(), location))
}

/// Asks the browser to drop its session cookie.
///
/// There's no server-side revocation: this works because the browser
/// stops sending the token, not because the token stops being valid.
pub(crate) async fn logout<P, D>(
    State(state): State<Arc<ServerState<P, D>>>,
) -> Result<Response, PitchsideError>
where
    P: IdentityProvider,
    D: AdminDirectory,
{
    let location = location_header(&state.post_logout_redirect)?;
    tracing::info!("session cookie cleared");
    Ok(see_other(location, [logout_cookie().to_string()]))
}

/// Returns the logged-in admin's `{email, name}`.
pub(crate) async fn me(AdminSession(identity): AdminSession) -> Json<Identity> {
    Json(identity)
}

/// Builds a `Location` value, refusing targets that can't go in a header.
fn location_header(target: &str) -> Result<HeaderValue, PitchsideError> {
    HeaderValue::try_from(target).map_err(|_| {
        PitchsideError::Config("redirect target is not a valid header value".into())
    })
}

/// `303 See Other` to `location`, setting each cookie in order.
fn see_other<const N: usize>(location: HeaderValue, cookies: [String; N]) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(LOCATION, location)],
        AppendHeaders(cookies.map(|cookie| (SET_COOKIE, cookie))),
    )
        .into_response()
}

/// Compares the returned `state` with the cookie in constant time.
fn states_match(expected: &str, returned: &str) -> bool {
    expected.len() == returned.len()
        && bool::from(expected.as_bytes().ct_eq(returned.as_bytes()))
}

/// Generates a random 128-bit `state` nonce as 32 lowercase hex characters.
fn generate_state() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
