use std::env;

pub const SPOTIFY_SCOPES: &str = "user-library-read playlist-modify-private";

#[derive(Debug, Clone)]
pub struct Config {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_auth_url: String,
    pub spotify_token_url: String,
    pub spotify_api_url: String,
    /// Loopback address the identity provider redirects back to. Must match the
    /// redirect URI registered for the client id.
    pub spotify_redirect_uri: String,
    pub inference_api_key: String,
    pub inference_base_url: String,
    pub inference_model: String,
    pub inference_temperature: f32,
    pub server_host: String,
    pub server_port: u16,
    pub http_timeout_secs: u64,
    pub token_cache_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let server_port: u16 = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8501".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("SERVER_PORT must be a valid port: {}", e))?;

        let inference_temperature: f32 = env::var("INFERENCE_TEMPERATURE")
            .unwrap_or_else(|_| "0.1".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("INFERENCE_TEMPERATURE must be a number: {}", e))?;

        // Low but never zero
        if !(inference_temperature > 0.0 && inference_temperature <= 1.0) {
            return Err(anyhow::anyhow!(
                "INFERENCE_TEMPERATURE must be in (0, 1], got {}",
                inference_temperature
            ));
        }

        let http_timeout_secs: u64 = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("HTTP_TIMEOUT_SECS must be a whole number of seconds: {}", e))?;

        let token_cache_capacity: usize = env::var("TOKEN_CACHE_CAPACITY")
            .unwrap_or_else(|_| "64".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("TOKEN_CACHE_CAPACITY must be a number: {}", e))?;

        if token_cache_capacity == 0 {
            return Err(anyhow::anyhow!("TOKEN_CACHE_CAPACITY must be greater than zero"));
        }

        Ok(Config {
            spotify_client_id: required("SPOTIFY_CLIENT_ID")?,
            spotify_client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            spotify_auth_url: env::var("SPOTIFY_AUTH_URL")
                .unwrap_or_else(|_| "https://accounts.spotify.com/authorize".to_string()),
            spotify_token_url: env::var("SPOTIFY_TOKEN_URL")
                .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string()),
            spotify_api_url: env::var("SPOTIFY_API_URL")
                .unwrap_or_else(|_| "https://api.spotify.com/v1".to_string()),
            spotify_redirect_uri: format!("http://localhost:{}", server_port),
            inference_api_key: required("FIREWORKS_API_KEY")?,
            inference_base_url: env::var("INFERENCE_BASE_URL")
                .unwrap_or_else(|_| "https://api.fireworks.ai/inference/v1".to_string()),
            inference_model: env::var("INFERENCE_MODEL")
                .unwrap_or_else(|_| "accounts/fireworks/models/firefunction-v1".to_string()),
            inference_temperature,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port,
            http_timeout_secs,
            token_cache_capacity,
        })
    }

    pub fn scopes(&self) -> &'static str {
        SPOTIFY_SCOPES
    }
}

fn required(name: &str) -> Result<String, anyhow::Error> {
    let value = env::var(name)
        .map_err(|_| anyhow::anyhow!("{} environment variable must be set", name))?;

    if value.trim().is_empty() {
        return Err(anyhow::anyhow!("{} must not be empty", name));
    }

    Ok(value)
}

#[cfg(test)]
impl Config {
    /// Config pointing every outbound endpoint at a single mock server.
    pub fn for_mock_server(base_url: &str) -> Self {
        Config {
            spotify_client_id: "client-id".to_string(),
            spotify_client_secret: "client-secret".to_string(),
            spotify_auth_url: format!("{}/authorize", base_url),
            spotify_token_url: format!("{}/api/token", base_url),
            spotify_api_url: format!("{}/v1", base_url),
            spotify_redirect_uri: "http://localhost:8501".to_string(),
            inference_api_key: "inference-key".to_string(),
            inference_base_url: format!("{}/inference/v1", base_url),
            inference_model: "accounts/fireworks/models/firefunction-v1".to_string(),
            inference_temperature: 0.1,
            server_host: "127.0.0.1".to_string(),
            server_port: 8501,
            http_timeout_secs: 5,
            token_cache_capacity: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Every case shares the process environment, so they run in one test
    #[test]
    fn test_from_env_rejects_malformed_numbers() {
        env::set_var("SPOTIFY_CLIENT_ID", "client-id");
        env::set_var("SPOTIFY_CLIENT_SECRET", "client-secret");
        env::set_var("FIREWORKS_API_KEY", "inference-key");

        env::set_var("HTTP_TIMEOUT_SECS", "soon");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"));

        env::set_var("HTTP_TIMEOUT_SECS", "15");
        env::set_var("TOKEN_CACHE_CAPACITY", "0");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("TOKEN_CACHE_CAPACITY"));

        env::remove_var("TOKEN_CACHE_CAPACITY");
        let config = Config::from_env().unwrap();
        assert_eq!(config.http_timeout_secs, 15);
        assert_eq!(config.token_cache_capacity, 64);

        env::remove_var("HTTP_TIMEOUT_SECS");
    }
}
