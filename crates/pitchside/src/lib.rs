//! # Pitchside
//!
//! Cookie-session admin authentication for a sports club website's API.
//!
//! Admins log in through an external identity provider, are checked once
//! against an allow-list, and then carry a signed, self-contained session
//! token in an `HttpOnly` cookie. Protected handlers take an
//! [`AdminSession`] argument and only run for valid sessions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pitchside::prelude::*;
//!
//! // Implement IdentityProvider for your OAuth provider, then:
//! // let server = PitchsideServer::builder(secret)
//! //     .bind("0.0.0.0:8080")
//! //     .build(my_provider, StaticAllowList::new(["coach@club.example"]))
//! //     .await?;
//! // server.run().await
//! ```

mod config;
mod error;
mod guard;
mod handler;
mod server;

pub use config::{env, ServerConfig};
pub use error::PitchsideError;
pub use guard::{authorize, AdminSession};
pub use handler::{OAUTH_STATE_COOKIE, OAUTH_STATE_MAX_AGE_SECS};
pub use server::{PitchsideServer, PitchsideServerBuilder};

pub use axum;
pub use pitchside_session as session;
pub use pitchside_token as token;
pub use pitchside_transport as transport;

pub mod prelude {
    pub use crate::{
        AdminSession, PitchsideError, PitchsideServer, PitchsideServerBuilder,
        ServerConfig,
    };
    pub use pitchside_session::{
        AdminDirectory, Identity, IdentityProvider, ServerSecret,
        SessionConfig, SessionError, StaticAllowList,
    };
}
