//! `PitchsideServer` builder and server loop.
//!
//! This is the entry point for running the admin auth server. It ties
//! together all the layers: token → session → cookie transport → HTTP.

use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};
use pitchside_session::{
    AdminDirectory, IdentityProvider, ServerSecret, SessionConfig,
    SessionIssuer, SessionValidator,
};
use tokio::net::TcpListener;

use crate::handler;
use crate::{PitchsideError, ServerConfig};

/// Shared state passed to the login-flow handlers.
///
/// Wrapped in `Arc` so each request gets a cheap clone. Nothing in here is
/// mutable: the issuer holds the secret, and the provider and directory
/// are shared read-only collaborators.
pub(crate) struct ServerState<P, D> {
    pub(crate) issuer: SessionIssuer,
    pub(crate) provider: P,
    pub(crate) directory: D,
    pub(crate) post_login_redirect: String,
    pub(crate) post_logout_redirect: String,
}

/// Builder for configuring and starting a Pitchside server.
///
/// # Example
///
/// ```rust,ignore
/// use pitchside::prelude::*;
///
/// let secret = ServerSecret::new(std::env::var("PITCHSIDE_SESSION_SECRET")?)?;
/// let server = PitchsideServer::builder(secret)
///     .bind("0.0.0.0:8080")
///     .routes(Router::new().route("/api/admin/roster", get(roster)))
///     .build(my_provider, StaticAllowList::new(["coach@club.example"]))
///     .await?;
/// server.run().await
/// ```
pub struct PitchsideServerBuilder {
    config: ServerConfig,
    routes: Router,
}

impl PitchsideServerBuilder {
    /// Creates a builder with default settings and the given secret.
    pub fn new(secret: ServerSecret) -> Self {
        Self::from_config(ServerConfig::new(secret))
    }

    /// Creates a builder from a complete config (e.g. [`ServerConfig::from_env`]).
    pub fn from_config(config: ServerConfig) -> Self {
        Self {
            config,
            routes: Router::new(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.config.session = config;
        self
    }

    /// Sets where the browser goes after logging in.
    pub fn post_login_redirect(mut self, path: &str) -> Self {
        self.config.post_login_redirect = path.to_string();
        self
    }

    /// Sets where the browser goes after logging out.
    pub fn post_logout_redirect(mut self, path: &str) -> Self {
        self.config.post_logout_redirect = path.to_string();
        self
    }

    /// Adds application routes (the protected admin API).
    ///
    /// Handlers in `routes` require a session by taking an
    /// [`AdminSession`](crate::AdminSession) argument. May be called more
    /// than once; routes accumulate.
    pub fn routes(mut self, routes: Router) -> Self {
        self.routes = self.routes.merge(routes);
        self
    }

    /// Builds the full router without binding a listener.
    ///
    /// # Errors
    /// Returns [`PitchsideError::Config`] if the config fails validation.
    pub fn into_router<P, D>(
        self,
        provider: P,
        directory: D,
    ) -> Result<Router, PitchsideError>
    where
        P: IdentityProvider,
        D: AdminDirectory,
    {
        self.config.validate()?;
        let ServerConfig {
            secret,
            session,
            post_login_redirect,
            post_logout_redirect,
            ..
        } = self.config;

        let validator = SessionValidator::new(secret.clone());
        let state = Arc::new(ServerState {
            issuer: SessionIssuer::new(secret, session),
            provider,
            directory,
            post_login_redirect,
            post_logout_redirect,
        });

        let auth_routes = Router::new()
            .route("/auth/login", get(handler::login::<P, D>))
            .route("/auth/callback", get(handler::callback::<P, D>))
            .route(
                "/auth/logout",
                get(handler::logout::<P, D>).post(handler::logout::<P, D>),
            )
            .route("/api/auth/me", get(handler::me))
            .with_state(state);

        // The validator goes in as an extension on EVERY route, so the
        // `AdminSession` guard works the same in application routes.
        Ok(auth_routes
            .merge(self.routes)
            .layer(Extension(validator)))
    }

    /// Binds the listener and builds the server with the given identity
    /// provider and admin directory.
    ///
    /// # Errors
    /// - [`PitchsideError::Config`] — invalid config
    /// - [`PitchsideError::Io`] — the address couldn't be bound
    pub async fn build<P, D>(
        self,
        provider: P,
        directory: D,
    ) -> Result<PitchsideServer, PitchsideError>
    where
        P: IdentityProvider,
        D: AdminDirectory,
    {
        let bind_addr = self.config.bind_addr.clone();
        let router = self.into_router(provider, directory)?;
        let listener = TcpListener::bind(&bind_addr).await?;
        Ok(PitchsideServer { listener, router })
    }
}

/// A bound Pitchside server.
///
/// Call [`run()`](Self::run) to start serving requests.
pub struct PitchsideServer {
    listener: TcpListener,
    router: Router,
}

impl PitchsideServer {
    /// Creates a new builder.
    pub fn builder(secret: ServerSecret) -> PitchsideServerBuilder {
        PitchsideServerBuilder::new(secret)
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until the process is terminated.
    ///
    /// Each request is handled on its own task; validation is a pure
    /// function of the token, the clock, and the secret, so requests never
    /// wait on each other.
    pub async fn run(self) -> Result<(), PitchsideError> {
        match self.listener.local_addr() {
            Ok(addr) => tracing::info!(%addr, "Pitchside server running"),
            Err(_) => tracing::info!("Pitchside server running"),
        }
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }
}
