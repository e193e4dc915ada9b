use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MIN_SONG_COUNT: u32 = 1;
pub const MAX_SONG_COUNT: u32 = 30;
pub const DEFAULT_SONG_COUNT: u32 = 10;

/// What the user asked for on the form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecommendationRequest {
    #[validate(length(min = 1, max = 1000))]
    pub prompt: String,
    #[validate(range(min = MIN_SONG_COUNT, max = MAX_SONG_COUNT))]
    pub song_count: u32,
}

impl RecommendationRequest {
    /// What the form asks for, shown when a submit does not validate.
    pub fn hint() -> String {
        format!(
            "describe the music and pick between {} and {} songs",
            MIN_SONG_COUNT, MAX_SONG_COUNT
        )
    }

    pub fn new(prompt: impl Into<String>, song_count: u32) -> Self {
        Self {
            prompt: prompt.into().trim().to_string(),
            song_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedSong {
    #[serde(rename = "songname")]
    pub title: String,
    pub artists: Vec<String>,
}

impl RecommendedSong {
    /// Free-text catalog query: title followed by the comma-joined artists.
    pub fn search_query(&self) -> String {
        format!("{} {}", self.title, self.artists.join(","))
    }
}

/// Arguments of the `create_playlist` function call returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub playlist_name: String,
    pub playlist_description: String,
    pub songs: Vec<RecommendedSong>,
}
