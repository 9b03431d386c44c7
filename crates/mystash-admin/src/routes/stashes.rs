//! `/stashes` routes.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use mystash_types::savings::{Stash, StashDetail};
use mystash_types::user::VerificationStats;
use mystash_types::Paginated;

use super::{ok, AuthQuery, Enveloped};
use crate::error::ServiceResult;
use crate::params::PageQuery;
use crate::resolver::AuthStoreResolver;
use crate::services::stashes::{self, OwnedStash};
use crate::state::SharedState;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/stashes", get(list))
        .route("/stashes/stash/:id", get(by_id))
        .route("/stashes/auth/:auth_id", get(by_auth))
        .route("/stashes/save-type/:save_type", get(by_save_type))
        .route("/stashes/active", get(active))
        .route("/stashes/stats", get(stats))
        .route("/stashes/detailed", get(detailed))
        .route("/stashes/detailed/auth/:auth_id", get(detailed_by_auth))
}

fn resolver(state: &SharedState) -> AuthStoreResolver {
    AuthStoreResolver::new(state.stores.auth.clone())
}

async fn list(State(state): State<SharedState>, Query(q): Query<PageQuery>) -> ServiceResult<Json<Paginated<Stash>>> {
    stashes::list(&state, q.request()).await.map(Json)
}

async fn by_id(State(state): State<SharedState>, Path(id): Path<String>) -> Enveloped<Stash> {
    let stash = stashes::by_id(&state, &id).await?;
    Ok(ok("Stash retrieved successfully", stash))
}

async fn by_auth(
    State(state): State<SharedState>,
    Path(auth_id): Path<String>,
    Query(q): Query<PageQuery>,
) -> Enveloped<Paginated<Stash>> {
    let page = stashes::by_auth(&state, &auth_id, q.request()).await?;
    Ok(ok("User stashes retrieved successfully", page))
}

async fn by_save_type(
    State(state): State<SharedState>,
    Path(save_type): Path<String>,
    Query(q): Query<PageQuery>,
) -> Enveloped<Paginated<Stash>> {
    let (save_type, page) = stashes::by_save_type(&state, &save_type, q.request()).await?;
    let message = format!("Stashes with save type '{}' retrieved successfully", save_type.as_str());
    Ok(ok(&message, page))
}

async fn active(State(state): State<SharedState>, Query(q): Query<AuthQuery>) -> Enveloped<Vec<Stash>> {
    let found = stashes::active(&state, q.auth_id.as_deref()).await?;
    Ok(ok("Active stashes retrieved successfully", found))
}

async fn stats(State(state): State<SharedState>) -> Enveloped<VerificationStats> {
    let stats = stashes::stats(&state).await?;
    Ok(ok("User statistics retrieved successfully", stats))
}

async fn detailed(
    State(state): State<SharedState>,
    Query(q): Query<PageQuery>,
) -> ServiceResult<Json<Paginated<StashDetail>>> {
    stashes::detailed(&state, &resolver(&state), q.request()).await.map(Json)
}

async fn detailed_by_auth(
    State(state): State<SharedState>,
    Path(auth_id): Path<String>,
    Query(q): Query<PageQuery>,
) -> Enveloped<Paginated<OwnedStash>> {
    let page = stashes::detailed_by_auth(&state, &resolver(&state), &auth_id, q.request()).await?;
    Ok(ok("User stashes with details retrieved successfully", page))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use mystash_db::fixtures;
    use mystash_db::queries::{stashes as stash_rows, users as user_rows};

    use crate::routes::router;
    use crate::routes::testing::{get, test_state};

    #[tokio::test]
    async fn test_detailed_flattens_owner_fields() {
        let state = test_state();
        let owner = fixtures::user("ada@mystash.co");
        let stash = fixtures::stash(owner.auth, "NGN", 10.0);
        state.stores.auth.run(|c| user_rows::insert(c, &owner)).await.expect("seed user");
        state.stores.service.run(|c| stash_rows::insert(c, &stash)).await.expect("seed stash");

        let (status, body) = get(router(state), "/v1/stashes/detailed").await;
        assert_eq!(status, StatusCode::OK);
        let row = &body["data"][0];
        assert_eq!(row["userEmail"], "ada@mystash.co");
        assert_eq!(row["planStatus"], "active");
        assert_eq!(row["publicId"], stash.public_id.as_str());
        assert_eq!(body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn test_detailed_by_auth_carries_user_object() {
        let state = test_state();
        let stash = fixtures::stash(mystash_types::ObjectId::new(), "USD", 3.0);
        state.stores.service.run(|c| stash_rows::insert(c, &stash)).await.expect("seed stash");

        let uri = format!("/v1/stashes/detailed/auth/{}", stash.auth);
        let (status, body) = get(router(state), &uri).await;
        assert_eq!(status, StatusCode::OK);
        let row = &body["data"]["data"][0];
        assert!(row["user"].is_null());
        assert_eq!(row["userFirstName"], "N/A");
    }

    #[tokio::test]
    async fn test_invalid_save_type_is_400() {
        let (status, body) = get(router(test_state()), "/v1/stashes/save-type/weekly").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_stash_lookup_not_found() {
        let uri = format!("/v1/stashes/stash/{}", mystash_types::ObjectId::new());
        let (status, body) = get(router(test_state()), &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Stash not found");
    }
}
