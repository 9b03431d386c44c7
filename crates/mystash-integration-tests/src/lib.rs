//! Integration test harness for the MyStash admin API.
//!
//! Tests build the full router over in-memory stores, seed them through
//! the `mystash_db` fixtures and drive requests with `tower`'s `oneshot`.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p mystash-integration-tests
//! ```

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use mystash_admin::config::AdminConfig;
use mystash_admin::state::{AdminState, SharedState};
use tower::ServiceExt;

/// Fresh in-memory stores with default configuration.
///
/// # Panics
///
/// Panics if an in-memory store cannot be migrated.
#[allow(clippy::panic)]
pub fn fresh_state() -> SharedState {
    match AdminState::in_memory(AdminConfig::default()) {
        Ok(state) => Arc::new(state),
        Err(e) => panic!("in-memory stores: {e}"),
    }
}

/// One request against `state`'s router; returns status and JSON body
/// (`Null` when the body is not JSON).
///
/// # Panics
///
/// Panics if the request cannot be built or the body cannot be read.
#[allow(clippy::panic)]
pub async fn call(
    state: &SharedState,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    };
    let request = request.unwrap_or_else(|e| panic!("request {uri}: {e}"));

    let app: Router = mystash_admin::router(state.clone());
    let response = match app.oneshot(request).await {
        Ok(response) => response,
        Err(e) => panic!("router {uri}: {e}"),
    };
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|e| panic!("body {uri}: {e}"));
    (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
}

/// `GET uri`.
pub async fn get(state: &SharedState, uri: &str) -> (StatusCode, serde_json::Value) {
    call(state, "GET", uri, None).await
}
