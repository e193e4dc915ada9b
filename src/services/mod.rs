pub mod assembler;
pub mod recommender;
pub mod spotify;
pub mod token_exchanger;

pub use assembler::PlaylistAssembler;
pub use recommender::{Recommender, SongRecommender};
pub use spotify::{MusicCatalog, SpotifyClient};
pub use token_exchanger::TokenExchanger;

use crate::config::Config;
use std::time::Duration;

/// Shared outbound client; the timeout bounds every call to a remote service.
pub fn http_client(config: &Config) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))
}
