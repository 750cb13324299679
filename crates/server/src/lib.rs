//! PerkPass server library.
//!
//! Exposes the router and its building blocks so the binary, the CLI and
//! the integration tests all run the same code.
//!
//! # Architecture
//!
//! - Axum HTTP service with RPC procedures under `/api/trpc`
//! - Domain logic from `perkpass-core`
//! - State held in memory, mirrored to JSON blobs ([`storage`])
//! - Sentry + tracing for errors and logs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

use axum::{Router, middleware as axum_middleware};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::ServerConfig;
pub use error::AppError;
pub use state::AppState;
pub use storage::Storage;

/// Build the full application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .with_state(state)
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
