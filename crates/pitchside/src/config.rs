//! Server configuration, from code or from the environment.

use pitchside_session::{ServerSecret, SessionConfig};

use crate::PitchsideError;

/// Environment variable names read by [`ServerConfig::from_env`].
pub mod env {
    pub const BIND: &str = "PITCHSIDE_BIND";
    pub const SESSION_SECRET: &str = "PITCHSIDE_SESSION_SECRET";
    pub const SESSION_LIFETIME_SECS: &str = "PITCHSIDE_SESSION_LIFETIME_SECS";
    pub const POST_LOGIN_REDIRECT: &str = "PITCHSIDE_POST_LOGIN_REDIRECT";
    pub const POST_LOGOUT_REDIRECT: &str = "PITCHSIDE_POST_LOGOUT_REDIRECT";
}

/// Everything the server needs to start.
///
/// The secret is the only required value; every other field has a default.
/// `Debug` is safe to log because [`ServerSecret`] redacts itself.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on. Default: `127.0.0.1:8080`.
    pub bind_addr: String,

    /// HMAC key for session tokens. Loaded once, never rotated while the
    /// process runs.
    pub secret: ServerSecret,

    /// Session lifetime (also the session cookie's `Max-Age`).
    pub session: SessionConfig,

    /// Where the browser lands after a successful login. Default: `/admin/`.
    pub post_login_redirect: String,

    /// Where the browser lands after logout. Default: `/`.
    pub post_logout_redirect: String,
}

impl ServerConfig {
    /// A config with the given secret and defaults for everything else.
    pub fn new(secret: ServerSecret) -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            secret,
            session: SessionConfig::default(),
            post_login_redirect: "/admin/".to_string(),
            post_logout_redirect: "/".to_string(),
        }
    }

    /// Reads the config from `PITCHSIDE_*` environment variables.
    ///
    /// # Errors
    /// Returns [`PitchsideError::Config`] if the secret is missing or empty,
    /// the lifetime isn't a positive integer, or a redirect isn't a local
    /// path.
    pub fn from_env() -> Result<Self, PitchsideError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), but reads values through `lookup`.
    ///
    /// Tests use this to supply variables without touching the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PitchsideError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(env::SESSION_SECRET).ok_or_else(|| {
            PitchsideError::Config(format!("{} is not set", env::SESSION_SECRET))
        })?;
        let secret = ServerSecret::new(secret).map_err(|e| {
            PitchsideError::Config(format!("{}: {e}", env::SESSION_SECRET))
        })?;

        let mut config = Self::new(secret);

        if let Some(bind) = lookup(env::BIND) {
            config.bind_addr = bind;
        }
        if let Some(raw) = lookup(env::SESSION_LIFETIME_SECS) {
            config.session.lifetime_secs = match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(PitchsideError::Config(format!(
                        "{} must be a positive integer, got {raw:?}",
                        env::SESSION_LIFETIME_SECS
                    )));
                }
            };
        }
        if let Some(path) = lookup(env::POST_LOGIN_REDIRECT) {
            config.post_login_redirect = path;
        }
        if let Some(path) = lookup(env::POST_LOGOUT_REDIRECT) {
            config.post_logout_redirect = path;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the values that can't be enforced by their types.
    ///
    /// Redirect targets must be local paths (`/...`, not `//host/...` or a
    /// full URL) so a misconfiguration can't turn login into an open
    /// redirect.
    pub fn validate(&self) -> Result<(), PitchsideError> {
        for (what, path) in [
            ("post-login redirect", &self.post_login_redirect),
            ("post-logout redirect", &self.post_logout_redirect),
        ] {
            if !is_local_path(path) {
                return Err(PitchsideError::Config(format!(
                    "{what} must be a local path starting with '/', got {path:?}"
                )));
            }
        }
        if self.session.lifetime_secs == 0 {
            return Err(PitchsideError::Config(
                "session lifetime must be at least one second".into(),
            ));
        }
        Ok(())
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.starts_with("/\\")
        && !path.bytes().any(|b| b.is_ascii_control())
}
