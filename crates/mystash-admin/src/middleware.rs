//! Request logging.

use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn, Instrument};

use crate::state::SharedState;

/// Whether `path` falls under one of `excluded`, compared after stripping
/// the API prefix. `/health` also covers `/health/detailed`.
pub fn is_excluded(path: &str, prefix: &str, excluded: &[String]) -> bool {
    let prefix = format!("/{}", prefix.trim_matches('/'));
    let route = path.strip_prefix(prefix.as_str()).unwrap_or(path);
    excluded.iter().any(|e| {
        let e = e.trim_end_matches('/');
        route == e || route.strip_prefix(e).is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Emit one event per request with method, path, status and latency.
pub async fn log_requests(State(state): State<SharedState>, request: Request<Body>, next: Next) -> Response {
    let logging = &state.config.logging;
    let path = request.uri().path().to_string();
    if !logging.log_requests || is_excluded(&path, &state.config.server.prefix, &logging.exclude_routes) {
        return next.run(request).await;
    }

    let method = request.method().to_string();
    let span = tracing::info_span!("http.request", method = %method, path = %path);
    let started = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    let status = response.status().as_u16();
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    span.in_scope(|| {
        if response.status().is_server_error() {
            warn!(status, latency_ms, "request failed");
        } else {
            info!(status, latency_ms, "request served");
        }
    });
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn excluded() -> Vec<String> {
        vec!["/health".to_string()]
    }

    #[test]
    fn test_exclusion_is_relative_to_prefix() {
        assert!(is_excluded("/v1/health", "v1", &excluded()));
        assert!(is_excluded("/v1/health/database", "v1", &excluded()));
        assert!(!is_excluded("/v1/healthy", "v1", &excluded()));
        assert!(!is_excluded("/v1/users", "v1", &excluded()));
    }

    #[test]
    fn test_prefix_slashes_ignored() {
        assert!(is_excluded("/api/health", "/api/", &excluded()));
    }
}
