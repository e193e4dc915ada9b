use crate::error::Result;
use crate::models::{GeneratedPlaylist, RecommendationRequest};
use crate::services::{MusicCatalog, SongRecommender};
use std::sync::Arc;
use tracing::{info, warn};

/// Turns a free-text request into a private playlist in the user's account.
pub struct PlaylistAssembler {
    recommender: Arc<dyn SongRecommender>,
}

impl PlaylistAssembler {
    pub fn new(recommender: Arc<dyn SongRecommender>) -> Self {
        Self { recommender }
    }

    /// Runs recommend → resolve → create → add. Songs the catalog cannot find
    /// are dropped and reported back in `not_found`; every other failure aborts.
    pub async fn assemble(
        &self,
        catalog: &dyn MusicCatalog,
        request: &RecommendationRequest,
    ) -> Result<GeneratedPlaylist> {
        let mut recommendation = self.recommender.recommend(request).await?;

        let requested = request.song_count as usize;
        if recommendation.songs.len() > requested {
            warn!(
                "Model returned {} songs for {} requested, keeping the first {}",
                recommendation.songs.len(),
                requested,
                requested
            );
            recommendation.songs.truncate(requested);
        }

        let mut tracks = Vec::with_capacity(recommendation.songs.len());
        let mut not_found = Vec::new();

        for song in recommendation.songs {
            match catalog.search(&song).await? {
                Some(track) => tracks.push(track),
                None => {
                    warn!("No catalog match for \"{}\"", song.search_query());
                    not_found.push(song);
                }
            }
        }

        let user = catalog.current_user().await?;
        let playlist = catalog
            .create_playlist(
                &user.id,
                &recommendation.playlist_name,
                &recommendation.playlist_description,
                false,
            )
            .await?;

        // The provider rejects an empty batch
        if !tracks.is_empty() {
            let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
            catalog.add_items(&playlist.id, &uris).await?;
        }

        info!(
            "Playlist \"{}\" ready with {} tracks ({} not found)",
            playlist.name,
            tracks.len(),
            not_found.len()
        );

        Ok(GeneratedPlaylist {
            url: playlist.url(),
            playlist,
            tracks,
            not_found,
        })
    }
}
