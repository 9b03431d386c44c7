//! `/users` routes.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use mystash_types::reports::{AggregateBalances, UserAggregate, UserBalances, UserStashStats};
use mystash_types::savings::Stash;
use mystash_types::user::User;
use mystash_types::wallet::Wallet;
use mystash_types::Paginated;

use super::{ok, Enveloped};
use crate::error::ServiceResult;
use crate::params::PageQuery;
use crate::services::users;
use crate::state::SharedState;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/users", get(list))
        .route("/users/email/:email", get(by_email))
        .route("/users/aggregate/balances", get(aggregate_balances))
        .route("/users/:auth_id/stashes", get(stashes))
        .route("/users/:auth_id/wallets", get(wallets))
        .route("/users/:auth_id/balances", get(balances))
        .route("/users/:auth_id/aggregate", get(aggregate))
        .route("/users/:auth_id/stash-stats", get(stash_stats))
}

async fn list(State(state): State<SharedState>, Query(q): Query<PageQuery>) -> ServiceResult<Json<Paginated<User>>> {
    users::list(&state, q.request()).await.map(Json)
}

async fn by_email(State(state): State<SharedState>, Path(email): Path<String>) -> Enveloped<User> {
    let user = users::by_email(&state, &email).await?;
    Ok(ok("User retrieved successfully", user))
}

async fn stashes(
    State(state): State<SharedState>,
    Path(auth_id): Path<String>,
    Query(q): Query<PageQuery>,
) -> Enveloped<Paginated<Stash>> {
    let page = users::stashes_by_auth(&state, &auth_id, q.request()).await?;
    Ok(ok("User stashes retrieved successfully", page))
}

async fn wallets(
    State(state): State<SharedState>,
    Path(auth_id): Path<String>,
    Query(q): Query<PageQuery>,
) -> Enveloped<Paginated<Wallet>> {
    let page = users::wallets_by_auth(&state, &auth_id, q.request()).await?;
    Ok(ok("User wallets retrieved successfully", page))
}

async fn balances(State(state): State<SharedState>, Path(auth_id): Path<String>) -> Enveloped<UserBalances> {
    let balances = users::balances(&state, &auth_id).await?;
    Ok(ok("User balances retrieved successfully", balances))
}

async fn aggregate_balances(State(state): State<SharedState>) -> Enveloped<AggregateBalances> {
    let balances = users::aggregate_balances(&state).await?;
    Ok(ok("Aggregate user balances retrieved successfully", balances))
}

async fn aggregate(State(state): State<SharedState>, Path(auth_id): Path<String>) -> Enveloped<UserAggregate> {
    let data = users::aggregate(&state, &auth_id).await?;
    Ok(ok("User aggregate data retrieved successfully", data))
}

async fn stash_stats(State(state): State<SharedState>, Path(auth_id): Path<String>) -> Enveloped<UserStashStats> {
    let stats = users::stash_stats(&state, &auth_id).await?;
    Ok(ok("User stash statistics retrieved successfully", stats))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use mystash_db::fixtures;
    use mystash_db::queries::{users as user_rows, wallets as wallet_rows};

    use crate::routes::router;
    use crate::routes::testing::{get, test_state};

    #[tokio::test]
    async fn test_balances_route() {
        let state = test_state();
        let user = fixtures::user("ada@mystash.co");
        state.stores.auth.run(|c| user_rows::insert(c, &user)).await.expect("seed user");
        state
            .stores
            .service
            .run(|c| wallet_rows::insert(c, &fixtures::wallet(user.auth, "NGN", 120.0)))
            .await
            .expect("seed wallet");

        let uri = format!("/v1/users/{}/balances", user.auth);
        let (status, body) = get(router(state), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["wallets"]["NGN"], 120.0);
        assert_eq!(body["data"]["total"]["USD"], 0.0);
    }

    #[tokio::test]
    async fn test_unknown_email_is_404_envelope() {
        let (status, body) = get(router(test_state()), "/v1/users/email/nobody@mystash.co").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn test_list_defaults_garbage_paging() {
        let (status, body) = get(router(test_state()), "/v1/users?page=abc&limit=-4").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["page"], 1);
        assert_eq!(body["pagination"]["limit"], 20);
        assert_eq!(body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn test_malformed_auth_id_is_400() {
        let (status, body) = get(router(test_state()), "/v1/users/not-an-id/aggregate").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}
