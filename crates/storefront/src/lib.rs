//! Kiova Storefront library.
//!
//! Server-rendered wardrobe and marketplace app on top of the Base44
//! backend. The crate is a library so the router can be driven in tests;
//! the binary in `main.rs` only adds process setup.
//!
//! # Architecture
//!
//! - Axum web framework with Askama templates
//! - [`base44`] client for entities, auth and file integrations
//! - [`current_user`] caches the signed-in user for all handlers
//! - UI state (mood picks, upload drafts, Style Me picks) lives in
//!   in-memory `tower-sessions` sessions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod base44;
pub mod config;
pub mod current_user;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::time::Duration;

use axum::{Router, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the full application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}
