//! `/transactions` routes.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use mystash_types::ledger::{RecentActivity, Transaction, TransactionStats};
use mystash_types::Paginated;

use super::{ok, DateRangeQuery, Enveloped};
use crate::error::ServiceResult;
use crate::params::PageQuery;
use crate::services::transactions::{self, TransactionFilter};
use crate::state::SharedState;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/transactions", get(list))
        .route("/transactions/filtered", get(filtered))
        .route("/transactions/tnx/:id", get(by_id))
        .route("/transactions/reference/:reference", get(by_reference))
        .route("/transactions/recent-tnx/:auth_id", get(recent))
        .route("/transactions/user/:auth_id", get(by_auth))
        .route("/transactions/stats/:auth_id", get(stats))
        .route("/transactions/date-range", get(date_range))
        .route("/transactions/email/:email", get(by_email))
}

async fn list(
    State(state): State<SharedState>,
    Query(q): Query<PageQuery>,
) -> ServiceResult<Json<Paginated<Transaction>>> {
    transactions::list(&state, q.request()).await.map(Json)
}

async fn filtered(
    State(state): State<SharedState>,
    Query(q): Query<PageQuery>,
    Query(filter): Query<TransactionFilter>,
) -> ServiceResult<Json<Paginated<Transaction>>> {
    transactions::filtered(&state, &filter, q.request()).await.map(Json)
}

async fn by_id(State(state): State<SharedState>, Path(id): Path<String>) -> Enveloped<Transaction> {
    let tx = transactions::by_id(&state, &id).await?;
    Ok(ok("Transaction retrieved successfully", tx))
}

async fn by_reference(State(state): State<SharedState>, Path(reference): Path<String>) -> Enveloped<Transaction> {
    let tx = transactions::by_reference(&state, &reference).await?;
    Ok(ok("Transaction retrieved successfully", tx))
}

async fn recent(
    State(state): State<SharedState>,
    Path(auth_id): Path<String>,
) -> Enveloped<RecentActivity<Transaction>> {
    let activity = transactions::recent(&state, &auth_id).await?;
    Ok(ok("Recent transactions retrieved successfully", activity))
}

async fn by_auth(
    State(state): State<SharedState>,
    Path(auth_id): Path<String>,
    Query(q): Query<PageQuery>,
) -> Enveloped<Paginated<Transaction>> {
    let page = transactions::by_auth(&state, &auth_id, q.request()).await?;
    Ok(ok("User transactions retrieved successfully", page))
}

async fn stats(State(state): State<SharedState>, Path(auth_id): Path<String>) -> Enveloped<TransactionStats> {
    let stats = transactions::stats(&state, &auth_id).await?;
    Ok(ok("Transaction statistics retrieved successfully", stats))
}

async fn date_range(State(state): State<SharedState>, Query(q): Query<DateRangeQuery>) -> Enveloped<Vec<Transaction>> {
    let found = transactions::date_range_search(
        &state,
        q.start_date.as_deref(),
        q.end_date.as_deref(),
        q.auth_id.as_deref(),
    )
    .await?;
    Ok(ok("Transactions retrieved successfully for the specified date range", found))
}

async fn by_email(
    State(state): State<SharedState>,
    Path(email): Path<String>,
    Query(q): Query<PageQuery>,
) -> Enveloped<Paginated<Transaction>> {
    let page = transactions::by_email(&state, &email, q.request()).await?;
    Ok(ok("Transaction history retrieved successfully", page))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use mystash_db::fixtures;
    use mystash_db::queries::transactions as tx_rows;
    use mystash_types::enums::TransactionStatus;
    use mystash_types::ledger::Transaction;
    use mystash_types::ObjectId;

    use crate::params::{INVALID_DATE, START_AFTER_END};
    use crate::routes::router;
    use crate::routes::testing::{get, test_state};

    #[tokio::test]
    async fn test_date_range_validation() {
        let app = router(test_state());
        let (status, body) = get(
            app.clone(),
            "/v1/transactions/date-range?startDate=2024-03-01&endDate=2024-01-01",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], START_AFTER_END);

        let (status, body) = get(app, "/v1/transactions/date-range?startDate=soon&endDate=2024-01-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], INVALID_DATE);
    }

    #[tokio::test]
    async fn test_filtered_combines_page_and_filters() {
        let state = test_state();
        let auth = ObjectId::new();
        let failed = Transaction {
            status: TransactionStatus::Failed,
            ..fixtures::transaction(auth, "NGN", 4.0)
        };
        state
            .stores
            .service
            .run(|c| {
                tx_rows::insert(c, &fixtures::transaction(auth, "NGN", 1.0))?;
                tx_rows::insert(c, &fixtures::transaction(auth, "NGN", 2.0))?;
                tx_rows::insert(c, &failed)
            })
            .await
            .expect("seed");

        let uri = format!("/v1/transactions/filtered?authId={auth}&status=success&limit=1");
        let (status, body) = get(router(state), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total"], 2);
        assert_eq!(body["pagination"]["pages"], 2);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_filtered_rejects_bad_currency() {
        let (status, body) = get(router(test_state()), "/v1/transactions/filtered?currency=XYZ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}
