use serde::{Deserialize, Serialize};

use super::RecommendedSong;

/// Bearer credential for the catalog API. Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTrack {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner: PlaylistOwner,
    #[serde(default)]
    pub public: Option<bool>,
    pub external_urls: ExternalUrls,
}

impl Playlist {
    /// Link for the result page, falling back to the open.spotify.com form.
    pub fn url(&self) -> String {
        self.external_urls
            .spotify
            .clone()
            .unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", self.id))
    }
}

/// Outcome of one successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedPlaylist {
    pub playlist: Playlist,
    pub url: String,
    pub tracks: Vec<ResolvedTrack>,
    /// Recommended songs the catalog search had no hit for.
    pub not_found: Vec<RecommendedSong>,
}
