//! univ-cloud — multi-tenant coaching platform backend
//!
//! Long-running service that:
//! - Resolves tenant storefronts by subdomain for the SPA shell
//! - Manages educator accounts and student rosters (JWT authenticated)
//! - Verifies Razorpay payments and processes gateway webhooks
//! - Allocates paid student seats against the subscription quantity

mod api;
mod auth;
mod config;
mod db;
mod error;
mod media;
mod razorpay;
mod state;
mod tenant;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "univ_cloud=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting univ-cloud (env: {})", config.environment);

    // Initialize application state
    let state = AppState::new(&config).await?;

    // Build router
    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("univ-cloud listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
