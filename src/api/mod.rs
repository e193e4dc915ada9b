pub mod health;
pub mod pages;

pub use pages::AppState;

use crate::frontend;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::index).post(pages::generate))
        .route("/health", get(health::health))
        .route("/static/*path", get(frontend::serve_static))
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
