//! `/interests` routes, the only ones that write.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use mystash_types::savings::{Interest, InterestPatch, NewInterest};
use mystash_types::ApiResponse;

use super::{ok, Enveloped};
use crate::error::{ServiceError, ServiceResult};
use crate::services::interests;
use crate::state::SharedState;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/interests", get(list).post(create))
        .route("/interests/active", get(active))
        .route("/interests/currency/:currency", get(by_currency))
        .route("/interests/auth/:auth_id", get(by_auth))
        .route("/interests/profile/:profile_id", get(by_profile))
        .route("/interests/public/:public_id", get(by_public_id))
        .route("/interests/:id", get(by_id).put(update).delete(remove))
}

/// A JSON body, with extraction failures reported in the failure envelope.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ServiceResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ServiceError::Invalid(rejection.body_text()))
}

async fn list(State(state): State<SharedState>) -> Enveloped<Vec<Interest>> {
    let found = interests::list(&state).await?;
    Ok(ok("Interests retrieved successfully", found))
}

async fn active(State(state): State<SharedState>) -> Enveloped<Vec<Interest>> {
    let found = interests::active(&state).await?;
    Ok(ok("Active interests retrieved successfully", found))
}

async fn by_currency(State(state): State<SharedState>, Path(currency): Path<String>) -> Enveloped<Vec<Interest>> {
    let found = interests::by_currency(&state, &currency).await?;
    Ok(ok("Interests retrieved successfully", found))
}

async fn by_auth(State(state): State<SharedState>, Path(auth_id): Path<String>) -> Enveloped<Vec<Interest>> {
    let found = interests::by_auth(&state, &auth_id).await?;
    Ok(ok("Interests retrieved successfully", found))
}

async fn by_profile(State(state): State<SharedState>, Path(profile_id): Path<String>) -> Enveloped<Vec<Interest>> {
    let found = interests::by_profile(&state, &profile_id).await?;
    Ok(ok("Interests retrieved successfully", found))
}

async fn by_public_id(State(state): State<SharedState>, Path(public_id): Path<String>) -> Enveloped<Interest> {
    let interest = interests::by_public_id(&state, &public_id).await?;
    Ok(ok("Interest retrieved successfully", interest))
}

async fn by_id(State(state): State<SharedState>, Path(id): Path<String>) -> Enveloped<Interest> {
    let interest = interests::by_id(&state, &id).await?;
    Ok(ok("Interest retrieved successfully", interest))
}

async fn create(
    State(state): State<SharedState>,
    payload: Result<Json<NewInterest>, JsonRejection>,
) -> ServiceResult<(StatusCode, Json<ApiResponse<Interest>>)> {
    let interest = interests::create(&state, body(payload)?).await?;
    Ok((StatusCode::CREATED, ok("Interest created successfully", interest)))
}

async fn update(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<InterestPatch>, JsonRejection>,
) -> Enveloped<Interest> {
    let interest = interests::update(&state, &id, body(payload)?).await?;
    Ok(ok("Interest updated successfully", interest))
}

async fn remove(State(state): State<SharedState>, Path(id): Path<String>) -> Enveloped<()> {
    interests::delete(&state, &id).await?;
    Ok(ok("Interest deleted successfully", ()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::router;
    use crate::routes::testing::{get, send, test_state};

    fn new_interest() -> serde_json::Value {
        json!({
            "publicId": "int-ngn-90",
            "startDay": 0,
            "endDay": 90,
            "currency": "NGN",
            "percentage": 12.0
        })
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let app = router(test_state());

        let (status, body) = send(app.clone(), "POST", "/v1/interests", Some(new_interest())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["active"], true);
        let id = body["data"]["_id"].as_str().expect("id").to_string();

        let (status, body) = send(app.clone(), "POST", "/v1/interests", Some(new_interest())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Interest with this publicId already exists");

        let uri = format!("/v1/interests/{id}");
        let (status, body) = send(app.clone(), "PUT", &uri, Some(json!({ "percentage": 9.5 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["percentage"], 9.5);

        let (status, _) = send(app.clone(), "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = get(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_terms_and_bodies() {
        let app = router(test_state());
        let mut bad = new_interest();
        bad["percentage"] = json!(150.0);
        let (status, body) = send(app.clone(), "POST", "/v1/interests", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, body) = send(app, "POST", "/v1/interests", Some(json!({ "currency": "NGN" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}
