//! Stats side channel
//!
//! Provides:
//! - `/debug/vars` - uptime, live task count and start time as JSON
//! - `/health` - liveness check
//!
//! Runs on its own task; nothing here feeds back into reconciliation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Process start times shared with handlers
#[derive(Debug, Clone)]
pub struct Stats {
    started: Instant,
    started_at: DateTime<Utc>,
}

impl Stats {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct DebugVars {
    /// Seconds since start
    uptime: u64,
    active_tasks: usize,
    started_at: String,
}

pub fn create_router(stats: Stats) -> Router {
    Router::new()
        .route("/debug/vars", get(vars_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(stats))
}

async fn vars_handler(State(stats): State<Arc<Stats>>) -> impl IntoResponse {
    Json(DebugVars {
        uptime: stats.started.elapsed().as_secs(),
        active_tasks: tokio::runtime::Handle::current()
            .metrics()
            .num_alive_tasks(),
        started_at: stats.started_at.to_rfc3339(),
    })
}

async fn health_handler() -> &'static str {
    "OK"
}

/// Serves the stats endpoints until `cancel` fires
pub async fn serve(addr: SocketAddr, stats: Stats, cancel: CancellationToken) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "stats endpoint listening");

    axum::serve(listener, create_router(stats))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_endpoint() {
        let router = create_router(Stats::new());

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_debug_vars_endpoint() {
        let router = create_router(Stats::new());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/debug/vars")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert!(json["uptime"].is_u64());
        assert!(json["active_tasks"].is_u64());
        let started_at = json["started_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(started_at).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let router = create_router(Stats::new());

        let response = router
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serve_stops_on_cancel() {
        let cancel = CancellationToken::new();
        let server = tokio::spawn(serve(
            "127.0.0.1:0".parse().unwrap(),
            Stats::new(),
            cancel.clone(),
        ));

        cancel.cancel();
        assert!(server.await.unwrap().is_ok());
    }
}
