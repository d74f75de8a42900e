//! Unified error type for Pitchside, and how it becomes an HTTP response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pitchside_session::SessionError;
use pitchside_token::TokenError;
use pitchside_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `pitchside` crate you deal with this single error type
/// instead of importing errors from each layer. The `#[from]` attribute on
/// each variant auto-generates `From` impls, so `?` converts sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum PitchsideError {
    /// A session-level error (provider, directory, allow-list, rejection).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A token-level error (encode, secret).
    #[error(transparent)]
    Token(#[from] TokenError),

    /// A cookie-level error (invalid name or value).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// No valid session accompanied the request.
    ///
    /// Carries no reason: a missing cookie, a bad signature,
    /// and an expired token all look identical to the client.
    #[error("unauthorized")]
    Unauthorized,

    /// The request was malformed (e.g. a login callback with no `state`).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The server configuration is incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// [`AdminSession`](crate::AdminSession) was used on a route that isn't
    /// served by a Pitchside router, so there is no validator to ask.
    #[error("session guard used outside a Pitchside router")]
    MissingValidator,

    /// Binding or serving the listener failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PitchsideError {
    /// The status code and the short `error` label sent to the client.
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Unauthorized
            | Self::Session(SessionError::Rejected(_)) => {
                (StatusCode::UNAUTHORIZED, "unauthorized")
            }
            Self::Session(SessionError::NotAdmin(_)) => {
                (StatusCode::FORBIDDEN, "forbidden")
            }
            Self::Session(SessionError::Provider(_)) => {
                (StatusCode::BAD_GATEWAY, "identity_provider_failed")
            }
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Self::Session(_)
            | Self::Token(_)
            | Self::Transport(_)
            | Self::Config(_)
            | Self::MissingValidator
            | Self::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

/// Renders as `{"error": "<kind>"}` with a matching status.
///
/// Only the short label leaves the server. The full error (which may name
/// an email or an upstream failure) goes to the log instead.
impl IntoResponse for PitchsideError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status == StatusCode::BAD_GATEWAY {
            tracing::warn!(error = %self, "upstream failure");
        } else if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request refused");
        }
        (status, Json(serde_json::json!({ "error": kind }))).into_response()
    }
}
