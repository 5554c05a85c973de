//! HTTP API server

use super::{
    dto::{
        FeedbackRequest, FeedbackResponse, RecommendationRequest, RecommendationsResponse,
        TripDetail, TripView,
    },
    error::ApiError,
    state::{AppState, RECENT_FEEDBACK_LIMIT},
};
use crate::config::ServerConfig;
use crate::types::TripId;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server address
    pub addr: SocketAddr,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        ServerConfig::default().into()
    }
}

impl From<ServerConfig> for ApiServerConfig {
    fn from(config: ServerConfig) -> Self {
        Self { addr: config.addr }
    }
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Create new API server
    pub fn new(config: ApiServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build router
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/health", get(health_handler))
            // Recommendations (`/generate-plan` is the route browsers already use)
            .route("/recommendations", post(recommend_handler))
            .route("/generate-plan", post(recommend_handler))
            // Feedback
            .route("/feedback", post(feedback_handler))
            // Catalog inspection
            .route("/trips", get(list_trips_handler))
            .route("/trips/:id", get(trip_handler))
            // State
            .with_state(state)
            // Middleware
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn serve(self) -> anyhow::Result<()> {
        let router = Self::router(self.state);
        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;

        info!("API server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        debug!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[derive(Debug, Serialize)]
struct IndexResponse {
    message: String,
    version: String,
}

async fn index_handler() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Tripmatch recommendation backend running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health check handler
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    trips: usize,
    uptime_secs: i64,
}

async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let trips = state.engine.catalog().await?.len();
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        trips,
        uptime_secs: (chrono::Utc::now() - state.started_at).num_seconds(),
    }))
}

/// Recommendation handler
async fn recommend_handler(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let Json(request) = payload?;
    let query = request.into_query()?;
    debug!("Recommendation query: {:?}", query);

    let set = state.engine.recommend(&query).await?;
    Ok(Json(set.into()))
}

/// Feedback handler
async fn feedback_handler(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let Json(request) = payload?;
    let submission = request.into_submission()?;

    let ack = state.ledger.record(submission).await?;
    Ok(Json(ack.into()))
}

/// List catalog handler
async fn list_trips_handler(State(state): State<AppState>) -> Result<Json<Vec<TripView>>, ApiError> {
    let scorer = state.engine.scorer();
    let trips = state
        .engine
        .catalog()
        .await?
        .into_iter()
        .map(|entry| {
            let score = scorer.score(&entry.aggregate);
            TripView::new(entry, score)
        })
        .collect();
    Ok(Json(trips))
}

/// Single trip handler
async fn trip_handler(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<TripDetail>, ApiError> {
    let Path(id) = id?;
    let id = TripId(id);
    let entry = state.engine.entry(id).await?;
    let score = state.engine.scorer().score(&entry.aggregate);
    let recent_feedback = state.ledger.events_for(id, RECENT_FEEDBACK_LIMIT).await?;

    Ok(Json(TripDetail {
        view: TripView::new(entry, score),
        recent_feedback,
    }))
}
