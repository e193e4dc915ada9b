pub mod catalog;
pub mod recommendation;

pub use catalog::{AccessToken, CatalogUser, GeneratedPlaylist, Playlist, ResolvedTrack};
pub use recommendation::{Recommendation, RecommendationRequest, RecommendedSong};
