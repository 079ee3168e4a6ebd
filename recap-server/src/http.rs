//! Recap HTTP API
//!
//! Axum-based HTTP transport for the meeting RPC facade. Runs alongside the
//! Unix socket transport on port 8780 (configurable).
//!
//! Architecture: each endpoint has a thin axum handler that delegates to a
//! pure inner function, so the logic is directly testable without axum
//! dispatch machinery.
//!
//! Endpoints:
//! - GET  /health  — health check with DB status
//! - GET  /version — server version info
//! - POST /rpc     — procedure call: JSON map with a `procedure` tag

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use recap_core::error::RecapError;
use recap_core::rpc::{RpcRequest, RpcResponse};
use recap_core::RecapConfig;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub pool: SqlitePool,
    pub config: RecapConfig,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/rpc", post(rpc_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    pool: SqlitePool,
    config: RecapConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let state = Arc::new(HttpState { pool, config });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Recap HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Inner (directly testable) functions
// ============================================================================

/// Inner health check — queries DB and returns (status_code, json_body).
pub async fn health_inner(pool: &SqlitePool, socket_path: &str) -> (StatusCode, serde_json::Value) {
    let sqlite_ver = match recap_core::db::health_check(pool).await {
        Ok(v) => v,
        Err(e) => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({
                    "status": "unhealthy",
                    "error": e.to_string(),
                }),
            );
        }
    };

    (
        StatusCode::OK,
        serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "sqlite": sqlite_ver,
            "socket": socket_path,
        }),
    )
}

/// Inner version — returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "recap/1",
    })
}

/// Inner rpc — parses the tagged procedure map, dispatches it, and maps the
/// error taxonomy onto HTTP status codes. The process procedures come back
/// through the OK arm even when they report status=failed; that is their
/// normal failure channel.
pub async fn rpc_inner(
    pool: &SqlitePool,
    payload: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request: RpcRequest = match serde_json::from_value(payload) {
        Ok(req) => req,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                envelope(RpcResponse::err(format!("Invalid request: {}", e))),
            );
        }
    };

    match crate::router::dispatch(request, pool).await {
        Ok(data) => (StatusCode::OK, envelope(RpcResponse::ok(data))),
        Err(e) => {
            let code = match &e {
                RecapError::Validation(_) => StatusCode::BAD_REQUEST,
                RecapError::NotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (code, envelope(RpcResponse::err(e.to_string())))
        }
    }
}

fn envelope(resp: RpcResponse) -> serde_json::Value {
    serde_json::to_value(resp).unwrap_or_else(|_| {
        serde_json::json!({
            "status": "error",
            "error": "response serialization failed",
        })
    })
}

// ============================================================================
// Axum handler wrappers (thin — delegate to inner functions)
// ============================================================================

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.pool, &state.config.service.socket_path).await;
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn rpc_handler(
    State(state): State<Arc<HttpState>>,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    let (status, body) = rpc_inner(&state.pool, payload).await;
    (status, Json(body))
}

// ============================================================================
// Unit tests — call inner functions directly
// ============================================================================
