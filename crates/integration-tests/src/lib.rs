//! Integration tests for PerkPass.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p perkpass-integration-tests
//! ```
//!
//! Every test drives the full router in-process with
//! `tower::ServiceExt::oneshot`; no port is bound.
//!
//! # Test Categories
//!
//! - `moderation` - submit, approve, deny and delete
//! - `engagement` - redemptions, views, favorites and analytics
//! - `accounts` - login, subscriptions, webhooks and profile pictures

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use perkpass_server::{AppState, ServerConfig, Storage};
use serde_json::Value;
use tower::ServiceExt;

/// A router plus the state behind it.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Default configuration, in-memory storage.
    pub async fn new() -> Self {
        Self::with_storage(ServerConfig::default(), Storage::memory()).await
    }

    /// Custom configuration, in-memory storage.
    pub async fn with_config(config: ServerConfig) -> Self {
        Self::with_storage(config, Storage::memory()).await
    }

    pub async fn with_storage(config: ServerConfig, storage: Storage) -> Self {
        let state = AppState::with_storage(config, storage).await.unwrap();
        Self {
            router: perkpass_server::app(state.clone()),
            state,
        }
    }

    /// Send a request and return (status, raw body).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    /// GET `uri` and parse the body as JSON.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = self.send(request).await;
        (status, parse(&body))
    }

    /// POST `body` as JSON to `uri` and parse the response as JSON.
    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.post_with_headers(uri, body, &[]).await
    }

    pub async fn post_with_headers(
        &self,
        uri: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        for &(name, value) in headers {
            builder = builder.header(name, value);
        }
        let request = builder
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();
        let (status, body) = self.send(request).await;
        (status, parse(&body))
    }
}

/// Parse a JSON body; non-JSON bodies come back as a JSON string.
fn parse(body: &[u8]) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// RPC path for a procedure, e.g. `rpc("coupons.list")`.
#[must_use]
pub fn rpc(procedure: &str) -> String {
    format!("/api/trpc/{procedure}")
}
