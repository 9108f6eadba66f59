//! HTTP API server.
//!
//! Serves the dashboard pipeline over JSON and proxies the YouTube feed,
//! channel-id lookup and registration calls the web frontend needs.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/api/channels` | One dashboard page (filters, sort, pagination in the query) |
//! | `GET`  | `/api/stats` | Totals and top channels for the analytics view |
//! | `GET`  | `/api/youtube` | Latest uploads of `channelId` |
//! | `GET`  | `/api/youtube/playlist` | Entries of `playlistId` |
//! | `POST` | `/api/youtube/id-lookup` | `{channelUrl}` → `{channelId}` |
//! | `POST` | `/api/register` | `{channelId, channelType}` → submission |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "playlistId is required" } }
//! ```
//!
//! Error codes: `bad_request` (400), `unavailable` (503, no channel data
//! fetched yet), `upstream_error` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser frontend
//! can be served from a different origin.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use vtdash_core::{derive_view, ChannelSnapshot, DashboardView, RecencyActivity};

use crate::channels::create_store;
use crate::config::Config;
use crate::dashboard::{build_stats_report, DashboardQuery, StatsReport};
use crate::feed::{FeedClient, FeedItem};
use crate::lookup::fetch_channel_id;
use crate::refresh::{spawn_poller, SnapshotCache};
use crate::register::{submit_channel, ChannelType};

/// Shared state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    cache: SnapshotCache,
    feeds: Arc<FeedClient>,
}

impl AppState {
    fn activity(&self) -> RecencyActivity {
        RecencyActivity::from_now(self.config.activity.inactive_after_days)
    }

    async fn snapshot(&self) -> Result<Arc<ChannelSnapshot>, AppError> {
        self.cache
            .current()
            .await
            .ok_or_else(|| unavailable("channel data has not been fetched yet"))
    }
}

/// Build the API router over `cache`.
///
/// The caller owns refreshing the cache; [`run_server`] starts a poller.
pub fn build_router(config: Arc<Config>, cache: SnapshotCache) -> anyhow::Result<Router> {
    let feeds = Arc::new(FeedClient::new(&config.youtube)?);
    let state = AppState {
        config,
        cache,
        feeds,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/health", get(handle_health))
        .route("/api/channels", get(handle_channels))
        .route("/api/stats", get(handle_stats))
        .route("/api/youtube", get(handle_channel_feed))
        .route("/api/youtube/playlist", get(handle_playlist_feed))
        .route("/api/youtube/id-lookup", post(handle_id_lookup))
        .route("/api/register", post(handle_register))
        .layer(cors)
        .with_state(state))
}

/// Starts the HTTP server.
///
/// Binds to `[server].bind`, fetches the channel list once, then keeps it
/// fresh every `[source].refresh_secs`. Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let config = Arc::new(config.clone());

    let store = create_store(&config.source)?;
    let cache = SnapshotCache::new(Arc::from(store));
    if let Err(e) = cache.refresh().await {
        warn!(error = %e, "initial channel fetch failed; serving 503 until a refresh succeeds");
    }
    let poller = spawn_poller(
        cache.clone(),
        Duration::from_secs(config.source.refresh_secs),
    );

    let app = build_router(config, cache)?;

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("vtdash server listening on http://{}", bind_addr);
    let result = axum::serve(listener, app).await;

    poller.abort();
    result?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn unavailable(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::SERVICE_UNAVAILABLE,
        code: "unavailable".to_string(),
        message: message.into(),
    }
}

fn upstream_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "upstream_error".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/channels ============

async fn handle_channels(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<DashboardView>, AppError> {
    let Query(query) = query.map_err(|e| bad_request(e.body_text()))?;
    let dashboard = query
        .to_state(state.config.dashboard.page_size)
        .map_err(bad_request)?;

    let snapshot = state.snapshot().await?;
    Ok(Json(derive_view(&snapshot, &dashboard, &state.activity())))
}

// ============ GET /api/stats ============

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsQuery {
    show_original_vtuber: Option<bool>,
}

async fn handle_stats(
    State(state): State<AppState>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Json<StatsReport>, AppError> {
    let Query(query) = query.map_err(|e| bad_request(e.body_text()))?;
    let snapshot = state.snapshot().await?;
    Ok(Json(build_stats_report(
        &snapshot,
        query.show_original_vtuber.unwrap_or(true),
        &state.activity(),
    )))
}

// ============ GET /api/youtube, /api/youtube/playlist ============

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedQuery {
    channel_id: Option<String>,
    playlist_id: Option<String>,
    limit: Option<usize>,
}

impl FeedQuery {
    /// A zero limit means "use the default".
    fn limit(&self) -> Option<usize> {
        self.limit.filter(|l| *l > 0)
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String, AppError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| bad_request(format!("{} is required", name)))
}

async fn handle_channel_feed(
    State(state): State<AppState>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Result<Json<Vec<FeedItem>>, AppError> {
    let Query(query) = query.map_err(|e| bad_request(e.body_text()))?;
    let channel_id = required(&query.channel_id, "channelId")?;

    let items = state
        .feeds
        .fetch_channel_feed(&channel_id, query.limit())
        .await
        .map_err(|e| {
            warn!(channel_id = %channel_id, error = %e, "channel feed fetch failed");
            upstream_error(format!("Failed to fetch YouTube data: {}", e))
        })?;
    Ok(Json(items))
}

async fn handle_playlist_feed(
    State(state): State<AppState>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Result<Json<Vec<FeedItem>>, AppError> {
    let Query(query) = query.map_err(|e| bad_request(e.body_text()))?;
    let playlist_id = required(&query.playlist_id, "playlistId")?;

    let items = state
        .feeds
        .fetch_playlist_feed(&playlist_id, query.limit())
        .await
        .map_err(|e| {
            warn!(playlist_id = %playlist_id, error = %e, "playlist feed fetch failed");
            upstream_error(format!("Failed to fetch YouTube playlist data: {}", e))
        })?;
    Ok(Json(items))
}

// ============ POST /api/youtube/id-lookup ============

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest {
    channel_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    channel_id: String,
}

async fn handle_id_lookup(
    State(state): State<AppState>,
    body: Result<Json<LookupRequest>, JsonRejection>,
) -> Result<Json<LookupResponse>, AppError> {
    let Json(req) = body.map_err(|e| bad_request(e.body_text()))?;
    let channel_url = required(&req.channel_url, "channelUrl")
        .map_err(|_| bad_request("Missing required fields"))?;

    let timeout = Duration::from_secs(state.config.youtube.timeout_secs);
    let channel_id = fetch_channel_id(&channel_url, timeout).await.map_err(|e| {
        warn!(url = %channel_url, error = %e, "channel id lookup failed");
        bad_request("Failed to fetch channel ID")
    })?;

    Ok(Json(LookupResponse { channel_id }))
}

// ============ POST /api/register ============

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    channel_id: Option<String>,
    channel_type: Option<String>,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

async fn handle_register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(req) = body.map_err(|e| bad_request(e.body_text()))?;
    let missing = |_: AppError| bad_request("Missing required fields");
    let channel_id = required(&req.channel_id, "channelId").map_err(missing)?;
    let channel_type: ChannelType = required(&req.channel_type, "channelType")
        .map_err(missing)?
        .parse()
        .map_err(bad_request)?;

    submit_channel(&state.config.register, &channel_id, channel_type)
        .await
        .map_err(|e| {
            warn!(channel_id = %channel_id, error = %e, "channel submission failed");
            bad_request(e.to_string())
        })?;

    Ok(Json(MessageResponse {
        message: "Channel submitted successfully".to_string(),
    }))
}
