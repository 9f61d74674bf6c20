//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::analyzer::{Analyzer, VideoAnalysis};
use crate::error::SummarizerError;
use crate::page::PageObserver;

use super::handlers;
use super::models::{ApiResponse, NavigateRequest, SummarizeRequest};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub observer: Arc<PageObserver>,
}

/// Configure and start the HTTP server
pub async fn start_http_server(
    analyzer: Arc<Analyzer>,
    observer: Arc<PageObserver>,
    port: u16,
) -> Result<()> {
    info!("🚀 Starting HTTP server on port {}", port);

    let app_state = AppState { analyzer, observer };
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("🌐 API server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Router with routes, state and middleware wired up.
pub fn build_router(app_state: AppState) -> Router {
    // The content-script client calls from the watch page's origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // Health check endpoints (both paths for compatibility)
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        .route("/api/summarize", post(summarize_handler))
        .route("/api/navigate", post(navigate_handler))
        .with_state(app_state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(handlers::health_check().await))
}

/// Summarize handler: the `{action, videoData}` message pair.
async fn summarize_handler(
    State(state): State<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> impl IntoResponse {
    match handlers::summarize_video(&state.analyzer, &state.observer, &request).await {
        Ok(analysis) => (StatusCode::OK, Json(ApiResponse::success(analysis))),
        Err(e) => {
            let status = match e {
                SummarizerError::UnknownAction { .. } => StatusCode::BAD_REQUEST,
                SummarizerError::Superseded => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(ApiResponse::<VideoAnalysis>::error(e.to_string())))
        }
    }
}

/// Navigation report handler. `data.changed` tells the watcher whether
/// the sighting advanced the cursor or repeated the current video.
async fn navigate_handler(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> impl IntoResponse {
    let report = handlers::report_navigation(&state.observer, &request.url).await;
    (StatusCode::OK, Json(ApiResponse::success(report)))
}
