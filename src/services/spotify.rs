use crate::error::{AppError, Result};
use crate::models::{AccessToken, CatalogUser, Playlist, RecommendedSong, ResolvedTrack};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};

/// The catalog operations playlist assembly needs.
#[async_trait]
pub trait MusicCatalog: Send + Sync {
    /// First search hit for the song, or `None` when the catalog has nothing.
    async fn search(&self, song: &RecommendedSong) -> Result<Option<ResolvedTrack>>;

    async fn current_user(&self) -> Result<CatalogUser>;

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<Playlist>;

    /// Appends all uris in order with a single request.
    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Result<()>;
}

/// Spotify Web API client bound to one user's access token.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    base_url: String,
    access_token: AccessToken,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    uri: String,
}

#[derive(Debug, Serialize)]
struct CreatePlaylistRequest<'a> {
    name: &'a str,
    description: &'a str,
    public: bool,
}

#[derive(Debug, Serialize)]
struct AddItemsRequest<'a> {
    uris: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

impl SpotifyClient {
    pub fn new(client: Client, base_url: impl Into<String>, access_token: AccessToken) -> Self {
        Self {
            base_url: base_url.into(),
            access_token,
            client,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid Spotify API URL {}: {}", self.base_url, e))?;

        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Spotify API URL cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or(body);

        tracing::error!("Spotify API error: {} - {}", status, message);
        Err(AppError::CatalogApi {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl MusicCatalog for SpotifyClient {
    async fn search(&self, song: &RecommendedSong) -> Result<Option<ResolvedTrack>> {
        let query = song.search_query();
        tracing::debug!("Searching Spotify for: {}", query);

        let response = self
            .client
            .get(self.endpoint(&["search"])?)
            .bearer_auth(self.access_token.as_str())
            .query(&[("q", query.as_str()), ("type", "track"), ("limit", "1")])
            .send()
            .await?;

        let data: SearchResponse = Self::check(response).await?.json().await?;

        Ok(data
            .tracks
            .items
            .into_iter()
            .next()
            .map(|item| ResolvedTrack { uri: item.uri }))
    }

    async fn current_user(&self) -> Result<CatalogUser> {
        let response = self
            .client
            .get(self.endpoint(&["me"])?)
            .bearer_auth(self.access_token.as_str())
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<Playlist> {
        let response = self
            .client
            .post(self.endpoint(&["users", user_id, "playlists"])?)
            .bearer_auth(self.access_token.as_str())
            .json(&CreatePlaylistRequest {
                name,
                description,
                public,
            })
            .send()
            .await?;

        let playlist: Playlist = Self::check(response).await?.json().await?;
        tracing::info!("Created playlist {} ({})", playlist.name, playlist.id);

        Ok(playlist)
    }

    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint(&["playlists", playlist_id, "tracks"])?)
            .bearer_auth(self.access_token.as_str())
            .json(&AddItemsRequest { uris })
            .send()
            .await?;

        Self::check(response).await?;
        tracing::info!("Added {} tracks to playlist {}", uris.len(), playlist_id);

        Ok(())
    }
}
