use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Recommendation, RecommendationRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

pub const CREATE_PLAYLIST_FUNCTION: &str = "create_playlist";

const SYSTEM_PROMPT: &str = "You are MusicGPT, world's best music recommendation AI. \
Given a description of a user's music preference, you will recommend songs tailored to the user's preference.";

#[async_trait]
pub trait SongRecommender: Send + Sync {
    async fn recommend(&self, request: &RecommendationRequest) -> Result<Recommendation>;
}

/// Asks an OpenAI-compatible chat-completions endpoint for a playlist by
/// forcing a call to the `create_playlist` function.
pub struct Recommender {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    tools: Vec<Value>,
    tool_choice: Value,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: Value,
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

impl Recommender {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.inference_base_url.clone(),
            api_key: config.inference_api_key.clone(),
            model: config.inference_model.clone(),
            temperature: config.inference_temperature,
        }
    }

    fn endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, request: &RecommendationRequest) -> ChatRequest {
        let user_prompt = format!(
            "Create a playlist with {} songs that fits the following description: '''{}'''. \
             Come up with a creative and unique name for the playlist.",
            request.song_count, request.prompt
        );

        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt,
                },
            ],
            tools: vec![create_playlist_tool()],
            tool_choice: json!({
                "type": "function",
                "function": {"name": CREATE_PLAYLIST_FUNCTION}
            }),
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl SongRecommender for Recommender {
    async fn recommend(&self, request: &RecommendationRequest) -> Result<Recommendation> {
        info!(
            "Requesting {} song recommendations for: {}",
            request.song_count, request.prompt
        );

        let response = self
            .client
            .post(self.endpoint_url())
            .bearer_auth(&self.api_key)
            .json(&self.build_request(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            tracing::error!("Inference API error: {} - {}", status, message);
            return Err(AppError::InferenceApi {
                status: status.as_u16(),
                message,
            });
        }

        let recommendation = parse_recommendation(&body)?;
        info!(
            "Model proposed \"{}\" with {} songs",
            recommendation.playlist_name,
            recommendation.songs.len()
        );

        Ok(recommendation)
    }
}

/// Pulls the `create_playlist` arguments out of a chat-completions response body.
pub fn parse_recommendation(body: &str) -> Result<Recommendation> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
        AppError::RecommendationParse(format!("response is not a chat completion: {}", e))
    })?;

    let call = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.tool_calls.into_iter().next())
        .ok_or_else(|| AppError::RecommendationParse("response contains no tool call".to_string()))?;

    if call.function.name != CREATE_PLAYLIST_FUNCTION {
        return Err(AppError::RecommendationParse(format!(
            "model called unexpected function '{}'",
            call.function.name
        )));
    }

    // OpenAI sends arguments as a JSON string, some compatible servers as an object
    let arguments = match call.function.arguments {
        Value::String(raw) => serde_json::from_str(&raw).map_err(|e| {
            AppError::RecommendationParse(format!("arguments are not valid JSON: {}", e))
        })?,
        other => other,
    };

    let recommendation: Recommendation = serde_json::from_value(arguments).map_err(|e| {
        AppError::RecommendationParse(format!("arguments do not match the schema: {}", e))
    })?;

    if let Some(song) = recommendation.songs.iter().find(|s| s.artists.is_empty()) {
        return Err(AppError::RecommendationParse(format!(
            "song '{}' has no artists",
            song.title
        )));
    }

    Ok(recommendation)
}

fn create_playlist_tool() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": CREATE_PLAYLIST_FUNCTION,
            "description": "Creates a Spotify playlist based on a list of songs that should be added to the list",
            "parameters": {
                "type": "object",
                "properties": {
                    "playlist_name": {
                        "type": "string",
                        "description": "Name of the playlist"
                    },
                    "playlist_description": {
                        "type": "string",
                        "description": "Description for the playlist"
                    },
                    "songs": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "songname": {
                                    "type": "string",
                                    "description": "Name of the song that should be added to the playlist"
                                },
                                "artists": {
                                    "type": "array",
                                    "description": "List of all artists",
                                    "minItems": 1,
                                    "items": {
                                        "type": "string",
                                        "description": "Name of artist of the song"
                                    }
                                }
                            },
                            "required": ["songname", "artists"]
                        }
                    }
                },
                "required": ["songs", "playlist_name", "playlist_description"]
            }
        }
    })
}
