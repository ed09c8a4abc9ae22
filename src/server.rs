//! HTTP server exposing the push operation.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/push-to-lms/` | Fetch an environment and push its tables |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Error responses carry a single `detail` field:
//!
//! ```json
//! { "detail": "environment '23' not found or has no tables" }
//! ```
//!
//! `404` covers absent environments, rejected metadata fetches, and
//! environments with zero tables. `502` covers upstream transport failures
//! and malformed metadata payloads.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser-based
//! clients.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::models::{PushRequest, PushSummary};
use crate::push::{run_push, PushError};

/// Shared application state passed to route handlers via Axum's `State`
/// extractor.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

/// Starts the HTTP server.
///
/// Binds to the address configured in `[server].bind` and runs until the
/// process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(Arc::new(config.clone()));

    println!("lms-bridge listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application router. Separated from [`run_server`] so tests can
/// bind it to an ephemeral port.
pub fn router(config: Arc<Config>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/push-to-lms/", post(handle_push))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(AppState { config })
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

fn not_found(detail: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        detail: detail.into(),
    }
}

fn bad_gateway(detail: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_GATEWAY,
        detail: detail.into(),
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
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

// ============ POST /push-to-lms/ ============

/// JSON request body for `POST /push-to-lms/`. Store and index fall back to
/// the configured defaults when omitted.
#[derive(Debug, Deserialize)]
pub struct PushApiRequest {
    pub env_id: String,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub index_name: Option<String>,
}

async fn handle_push(
    State(state): State<AppState>,
    Json(body): Json<PushApiRequest>,
) -> Result<Json<PushSummary>, AppError> {
    let request = PushRequest {
        environment_id: body.env_id,
        store_name: body
            .store_name
            .unwrap_or_else(|| state.config.lms.store_name.clone()),
        index_name: body
            .index_name
            .unwrap_or_else(|| state.config.lms.index_name.clone()),
    };

    match run_push(&state.config, &request).await {
        Ok(summary) => Ok(Json(summary)),
        Err(e @ PushError::NotFound(_)) => Err(not_found(e.to_string())),
        Err(e) => Err(bad_gateway(e.to_string())),
    }
}
