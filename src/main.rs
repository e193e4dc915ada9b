mod api;
mod config;
mod error;
mod frontend;
mod models;
mod services;
mod views;

use crate::api::AppState;
use crate::config::Config;
use crate::services::{PlaylistAssembler, Recommender, TokenExchanger};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,playlist_generator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Initialize services
    let http_client = services::http_client(&config)?;
    let token_exchanger = Arc::new(TokenExchanger::new(http_client.clone(), &config)?);
    let recommender = Arc::new(Recommender::new(http_client.clone(), &config));
    let assembler = Arc::new(PlaylistAssembler::new(recommender));

    let app_state = Arc::new(AppState {
        token_exchanger,
        assembler,
        http_client,
        spotify_api_url: config.spotify_api_url.clone(),
    });

    let app = api::app(app_state);

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!(
        "Starting server on {} (Spotify redirect URI {})",
        addr,
        config.spotify_redirect_uri
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
