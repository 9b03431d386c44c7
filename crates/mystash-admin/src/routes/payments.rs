//! `/payments` routes.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use mystash_types::ledger::{Payment, PaymentStats};
use mystash_types::Paginated;

use super::{ok, DateRangeQuery, Enveloped, UidQuery};
use crate::error::ServiceResult;
use crate::params::PageQuery;
use crate::services::payments;
use crate::state::SharedState;

type Page = ServiceResult<Json<Paginated<Payment>>>;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/payments", get(list))
        .route("/payments/stats", get(stats))
        .route("/payments/by-reference/:reference", get(by_reference))
        .route("/payments/by-status/:status", get(by_status))
        .route("/payments/by-type/:payment_type", get(by_type))
        .route("/payments/by-category/:category", get(by_category))
        .route("/payments/date-range", get(date_range))
        .route("/payments/:id", get(by_id))
}

async fn list(State(state): State<SharedState>, Query(q): Query<PageQuery>) -> Page {
    payments::list(&state, q.request()).await.map(Json)
}

async fn stats(State(state): State<SharedState>, Query(q): Query<UidQuery>) -> Enveloped<PaymentStats> {
    let stats = payments::stats(&state, q.uid.as_deref()).await?;
    Ok(ok("Payment statistics retrieved successfully", stats))
}

async fn by_reference(State(state): State<SharedState>, Path(reference): Path<String>) -> Enveloped<Payment> {
    let payment = payments::by_reference(&state, &reference).await?;
    Ok(ok("Payment retrieved successfully", payment))
}

async fn by_status(State(state): State<SharedState>, Path(status): Path<String>, Query(q): Query<PageQuery>) -> Page {
    payments::by_status(&state, &status, q.request()).await.map(Json)
}

async fn by_type(
    State(state): State<SharedState>,
    Path(payment_type): Path<String>,
    Query(q): Query<PageQuery>,
) -> Page {
    payments::by_type(&state, &payment_type, q.request()).await.map(Json)
}

async fn by_category(
    State(state): State<SharedState>,
    Path(category): Path<String>,
    Query(q): Query<PageQuery>,
) -> Page {
    payments::by_category(&state, &category, q.request()).await.map(Json)
}

async fn date_range(State(state): State<SharedState>, Query(q): Query<DateRangeQuery>) -> Enveloped<Vec<Payment>> {
    let found =
        payments::date_range_search(&state, q.start_date.as_deref(), q.end_date.as_deref(), q.uid.as_deref())
            .await?;
    Ok(ok("Payments retrieved successfully for the specified date range", found))
}

async fn by_id(State(state): State<SharedState>, Path(id): Path<String>) -> Enveloped<Payment> {
    let payment = payments::by_id(&state, &id).await?;
    Ok(ok("Payment retrieved successfully", payment))
}
