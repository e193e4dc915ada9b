use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::views::{self, ShellState};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Spotify login failed: {0}")]
    AuthExchange(String),

    #[error("Spotify API error ({status}): {message}")]
    CatalogApi { status: u16, message: String },

    #[error("Could not read the recommendation: {0}")]
    RecommendationParse(String),

    #[error("Inference API error ({status}): {message}")]
    InferenceApi { status: u16, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthExchange(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::CatalogApi { .. }
            | AppError::RecommendationParse(_)
            | AppError::InferenceApi { .. }
            | AppError::Http(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// A rejected code or an expired token can only be fixed by logging in again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            AppError::AuthExchange(_) | AppError::CatalogApi { status: 401, .. }
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Internal(e) => tracing::error!("Internal error: {:?}", e),
            AppError::Http(e) => tracing::error!("Outbound request failed: {:?}", e),
            other => tracing::warn!("Request failed: {}", other),
        }

        let body = views::render(&ShellState::Failed {
            message: self.to_string(),
            requires_login: self.requires_login(),
            login_url: None,
        });

        (status, Html(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_token_requires_login() {
        let expired = AppError::CatalogApi {
            status: 401,
            message: "The access token expired".to_string(),
        };
        let missing = AppError::CatalogApi {
            status: 404,
            message: "Not found".to_string(),
        };

        assert!(expired.requires_login());
        assert!(!missing.requires_login());
        assert!(AppError::AuthExchange("Invalid authorization code".to_string()).requires_login());
    }
}
