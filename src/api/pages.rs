use crate::error::{AppError, Result};
use crate::models::recommendation::DEFAULT_SONG_COUNT;
use crate::models::RecommendationRequest;
use crate::services::{PlaylistAssembler, SpotifyClient, TokenExchanger};
use crate::views::{self, ShellState};
use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub struct AppState {
    pub token_exchanger: Arc<TokenExchanger>,
    pub assembler: Arc<PlaylistAssembler>,
    pub http_client: reqwest::Client,
    pub spotify_api_url: String,
}

/// Query string the identity provider redirects back with.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

impl RedirectParams {
    fn code(&self) -> Option<&str> {
        self.code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_song_count")]
    pub song_count: u32,
}

fn default_song_count() -> u32 {
    DEFAULT_SONG_COUNT
}

fn login_page(state: &AppState, params: &RedirectParams) -> Html<String> {
    Html(views::render(&ShellState::Unauthenticated {
        login_url: state.token_exchanger.authorize_url(),
        denied_reason: params.error.as_deref(),
    }))
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RedirectParams>,
) -> Result<Html<String>> {
    let Some(code) = params.code() else {
        return Ok(login_page(&state, &params));
    };

    // Exchanging here spends the code once; the form submit reuses the cached token
    state.token_exchanger.exchange(code).await?;

    Ok(Html(views::render(&ShellState::AwaitingInput {
        code,
        prompt: "",
        song_count: DEFAULT_SONG_COUNT,
        error: None,
    })))
}

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RedirectParams>,
    form: std::result::Result<Form<GenerateForm>, FormRejection>,
) -> Result<Response> {
    let Some(code) = params.code() else {
        return Ok(login_page(&state, &params).into_response());
    };

    let access_token = state.token_exchanger.exchange(code).await?;

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            let request = RecommendationRequest::new("", DEFAULT_SONG_COUNT);
            let error = AppError::Validation(format!(
                "{} ({})",
                RecommendationRequest::hint(),
                rejection.body_text()
            ));
            return Ok(form_with_error(code, &request, error));
        }
    };

    let request = RecommendationRequest::new(form.prompt, form.song_count);
    if let Err(e) = request.validate() {
        let error = AppError::Validation(format!("{} ({})", RecommendationRequest::hint(), e));
        return Ok(form_with_error(code, &request, error));
    }

    let catalog = SpotifyClient::new(
        state.http_client.clone(),
        state.spotify_api_url.clone(),
        access_token,
    );

    match state.assembler.assemble(&catalog, &request).await {
        Ok(result) => Ok(Html(views::render(&ShellState::Completed {
            code,
            result: &result,
        }))
        .into_response()),
        Err(e) if e.requires_login() => {
            tracing::warn!("Playlist generation needs a fresh login: {}", e);
            let body = views::render(&ShellState::Failed {
                message: e.to_string(),
                requires_login: true,
                login_url: Some(state.token_exchanger.authorize_url()),
            });
            Ok((e.status_code(), Html(body)).into_response())
        }
        Err(e) => {
            tracing::error!("Playlist generation failed: {}", e);
            Ok(form_with_error(code, &request, e))
        }
    }
}

/// Failed state: the error replaces the result link and the form stays filled in
/// so the user can resubmit.
fn form_with_error(code: &str, request: &RecommendationRequest, error: AppError) -> Response {
    let status: StatusCode = error.status_code();
    let message = match &error {
        AppError::Internal(_) => "Internal server error".to_string(),
        other => other.to_string(),
    };

    let body = views::render(&ShellState::AwaitingInput {
        code,
        prompt: &request.prompt,
        song_count: request.song_count,
        error: Some(message),
    });

    (status, Html(body)).into_response()
}
