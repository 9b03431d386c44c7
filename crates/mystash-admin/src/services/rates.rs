//! Exchange rates. Store errors propagate as faults.

use mystash_db::queries::rates;
use mystash_types::ledger::Rate;

use crate::error::{fault, ServiceError, ServiceResult};
use crate::params::object_id;
use crate::state::AdminState;

fn not_found() -> ServiceError {
    ServiceError::NotFound("Rate not found".into())
}

pub async fn list(state: &AdminState) -> ServiceResult<Vec<Rate>> {
    state.stores.service.run(rates::all).await.map_err(fault)
}

pub async fn active(state: &AdminState) -> ServiceResult<Vec<Rate>> {
    state.stores.service.run(rates::active).await.map_err(fault)
}

/// The active rate for `source -> destination`. Both codes are required.
pub async fn by_currency_pair(
    state: &AdminState,
    source: Option<&str>,
    destination: Option<&str>,
) -> ServiceResult<Rate> {
    let pick = |raw: Option<&str>| raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_uppercase);
    let (Some(source), Some(destination)) = (pick(source), pick(destination)) else {
        return Err(ServiceError::Invalid(
            "Source and destination currencies are required".into(),
        ));
    };
    state
        .stores
        .service
        .run(|c| rates::find_by_pair(c, &source, &destination))
        .await
        .map_err(fault)?
        .ok_or_else(not_found)
}

pub async fn by_public_id(state: &AdminState, public_id: &str) -> ServiceResult<Rate> {
    state
        .stores
        .service
        .run(|c| rates::find_by_public_id(c, public_id))
        .await
        .map_err(fault)?
        .ok_or_else(not_found)
}

pub async fn by_id(state: &AdminState, id: &str) -> ServiceResult<Rate> {
    let id = object_id(id, "rate ID")?;
    state
        .stores
        .service
        .run(|c| rates::find_by_id(c, &id))
        .await
        .map_err(fault)?
        .ok_or_else(not_found)
}
