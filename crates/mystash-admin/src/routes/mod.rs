//! HTTP routes.
//!
//! Each submodule owns the routes of one resource and delegates to the
//! matching service. Listings answer with the bare `{data, pagination}`
//! page, lookups and derived views with the `{success, message, data}`
//! envelope, and dashboard figures unwrapped.

pub mod accounts;
pub mod dashboard;
pub mod health;
pub mod interests;
pub mod legacy_transactions;
pub mod legacy_users;
pub mod payments;
pub mod rates;
pub mod stashes;
pub mod transactions;
pub mod transfers;
pub mod users;
pub mod wallets;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Json, Router};
use mystash_types::ApiResponse;
use serde::Deserialize;

use crate::error::ServiceResult;
use crate::middleware::log_requests;
use crate::state::SharedState;

pub const BANNER: &str = "MyStash Admin API v1";

/// Handler result carrying the success envelope.
pub type Enveloped<T> = ServiceResult<Json<ApiResponse<T>>>;

/// Wrap `data` in a success envelope.
pub fn ok<T>(message: &str, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok(message, data))
}

/// Optional `authId` query parameter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthQuery {
    pub auth_id: Option<String>,
}

/// Optional `uid` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct UidQuery {
    pub uid: Option<String>,
}

/// `startDate`/`endDate` plus an optional owner, as either `authId` or `uid`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub auth_id: Option<String>,
    pub uid: Option<String>,
}

async fn index() -> &'static str {
    BANNER
}

/// The full API under `/{prefix}`, with request logging applied.
pub fn router(state: SharedState) -> Router {
    let api = Router::new()
        .route("/", get(index))
        .merge(users::routes())
        .merge(stashes::routes())
        .merge(transactions::routes())
        .merge(wallets::routes())
        .merge(accounts::routes())
        .merge(transfers::routes())
        .merge(payments::routes())
        .merge(rates::routes())
        .merge(interests::routes())
        .merge(legacy_users::routes())
        .merge(legacy_transactions::routes())
        .merge(dashboard::routes())
        .merge(health::routes());

    let prefix = format!("/{}", state.config.server.prefix.trim_matches('/'));
    Router::new()
        .nest(&prefix, api)
        .layer(from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}
