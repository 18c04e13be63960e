//! HTTP transport.
//!
//! `GET /api?action=<name>&...` dispatches one action and answers with the
//! envelope body and its mapped status code. Every response allows any
//! origin; `OPTIONS /api` answers preflight requests.

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use gplay_dispatch::{to_envelope, ActionRouter, Request};
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the HTTP application.
pub fn app(router: Arc<ActionRouter>) -> Router {
    Router::new()
        .route("/api", get(api).options(preflight))
        .route("/health", get(health))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(router)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(router: Arc<ActionRouter>, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app(router))
        .await
        .context("server error")?;

    Ok(())
}

async fn api(
    State(router): State<Arc<ActionRouter>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let request = Request::from_pairs(params);
    let envelope = to_envelope(router.dispatch_request(&request).await);

    let status = StatusCode::from_u16(envelope.status.http_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope.body)).into_response()
}

async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "*"),
        ],
    )
}

async fn health() -> &'static str {
    "ok"
}
