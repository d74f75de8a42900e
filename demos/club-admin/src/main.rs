use pitchside::axum::routing::get;
use pitchside::axum::{Json, Router};
use pitchside::prelude::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Comma-separated admin emails for the demo allow-list.
const ADMINS_VAR: &str = "CLUB_ADMIN_EMAILS";

// ---------------------------------------------------------------------------
// Dev identity provider
// ---------------------------------------------------------------------------

/// Stand-in identity provider for local development.
///
/// `authorize_url` points straight back at our own callback with the code
/// `dev`, so the whole login flow runs without leaving the machine.
struct DevProvider {
    identity: Identity,
}

impl IdentityProvider for DevProvider {
    fn authorize_url(&self, state: &str) -> String {
        format!("/auth/callback?code=dev&state={state}")
    }

    async fn exchange(&self, code: &str) -> Result<Identity, SessionError> {
        if code == "dev" {
            Ok(self.identity.clone())
        } else {
            Err(SessionError::Provider(format!("unknown dev code {code:?}")))
        }
    }
}

// ---------------------------------------------------------------------------
// Admin API
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Player {
    number: u8,
    name: &'static str,
    position: &'static str,
}

#[derive(Serialize)]
struct Roster {
    viewed_by: String,
    players: Vec<Player>,
}

async fn roster(AdminSession(admin): AdminSession) -> Json<Roster> {
    tracing::info!(admin = %admin, "roster viewed");
    Json(Roster {
        viewed_by: admin.name,
        players: vec![
            Player { number: 1, name: "Sam Keeper", position: "GK" },
            Player { number: 4, name: "Alex Stone", position: "DF" },
            Player { number: 8, name: "Jo Runner", position: "MF" },
            Player { number: 9, name: "Kim Striker", position: "FW" },
        ],
    })
}

fn admin_routes() -> Router {
    Router::new().route("/api/admin/roster", get(roster))
}

/// Parses a comma-separated list of emails, skipping blanks.
fn parse_admins(raw: &str) -> StaticAllowList {
    StaticAllowList::new(
        raw.split(',')
            .map(str::trim)
            .filter(|email| !email.is_empty()),
    )
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let admins = parse_admins(
        &std::env::var(ADMINS_VAR).unwrap_or_else(|_| "coach@club.example".into()),
    );
    tracing::info!(admins = admins.len(), bind = %config.bind_addr, "starting club admin server");

    let provider = DevProvider {
        identity: Identity::new("coach@club.example", "Coach"),
    };

    let server = PitchsideServerBuilder::from_config(config)
        .routes(admin_routes())
        .build(provider, admins)
        .await?;

    server.run().await?;
    Ok(())
}
