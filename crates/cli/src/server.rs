//! Development server: the answer data endpoint plus static files

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::services::ServeDir;
use tracing::{debug, info};

use crate::store::SeriesStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<SeriesStore>,
}

impl AppState {
    pub fn new(store: SeriesStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let router = Router::new()
        .route("/api/answer-data/:answer_id", get(answer_data))
        .with_state(state);

    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

/// `GET /api/answer-data/{answer_id}`
pub async fn answer_data(State(state): State<AppState>, Path(answer_id): Path<String>) -> Response {
    match state.store.lookup(&answer_id) {
        Some(payload) => {
            debug!(answer_id = %answer_id, points = payload.len(), "serving answer data");
            Json(payload).into_response()
        }
        None => {
            debug!(answer_id = %answer_id, "no data for answer");
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "no data for this answer" })),
            )
                .into_response()
        }
    }
}

pub async fn serve(addr: SocketAddr, state: AppState, static_dir: Option<PathBuf>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state, static_dir)).await
}
