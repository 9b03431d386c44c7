//! Service results and their HTTP rendering.
//!
//! Services never build responses. They return [`ServiceError`] and the
//! boundary picks the status and body shape from the variant.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mystash_db::DbError;
use mystash_types::ApiResponse;
use serde::Serialize;
use tracing::error;

/// Why a service call produced no value.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Absent or tombstoned entity.
    #[error("{0}")]
    NotFound(String),

    /// Rejected before any store access.
    #[error("{0}")]
    Invalid(String),

    /// Unique field already taken.
    #[error("{0}")]
    Conflict(String),

    /// Store fault caught by the service; the message is client-safe.
    #[error("{0}")]
    Failed(String),

    /// Store fault propagated as-is; the client sees a generic body.
    #[error("{0}")]
    Fault(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Invalid(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Failed(_) | ServiceError::Fault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of an unhandled fault.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FaultBody {
    status_code: u16,
    timestamp: String,
    message: &'static str,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ServiceError::Fault(detail) => {
                error!(%detail, "unhandled store fault");
                let body = FaultBody {
                    status_code: status.as_u16(),
                    timestamp: chrono::Utc::now().to_rfc3339(),
                    message: "Internal server error",
                };
                (status, Json(body)).into_response()
            }
            ServiceError::NotFound(message)
            | ServiceError::Invalid(message)
            | ServiceError::Conflict(message)
            | ServiceError::Failed(message) => {
                (status, Json(ApiResponse::<()>::fail(message))).into_response()
            }
        }
    }
}

/// Map a store error to a caught failure carrying `message`.
///
/// The store error itself is only logged.
pub fn failed(message: &'static str) -> impl FnOnce(DbError) -> ServiceError {
    move |e| {
        error!(error = %e, "{message}");
        ServiceError::Failed(message.to_string())
    }
}

/// Map a store error to a propagated fault.
pub fn fault(e: DbError) -> ServiceError {
    ServiceError::Fault(e.to_string())
}
