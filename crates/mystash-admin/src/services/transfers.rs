//! Beneficiary payouts.

use mystash_db::queries::transfers;
use mystash_types::enums::TransferStatus;
use mystash_types::ledger::Transfer;
use mystash_types::{PageRequest, Paginated};

use crate::error::{failed, ServiceError, ServiceResult};
use crate::params::{object_id, one_of};
use crate::state::AdminState;

pub async fn list(state: &AdminState, page: PageRequest) -> ServiceResult<Paginated<Transfer>> {
    state
        .stores
        .service
        .run(|c| transfers::list(c, page))
        .await
        .map_err(failed("Failed to retrieve transfers"))
}

pub async fn by_id(state: &AdminState, id: &str) -> ServiceResult<Transfer> {
    let id = object_id(id, "transfer ID")?;
    state
        .stores
        .service
        .run(|c| transfers::find_by_id(c, &id))
        .await
        .map_err(failed("Failed to retrieve transfer"))?
        .ok_or_else(|| ServiceError::NotFound("Transfer not found".into()))
}

pub async fn by_auth(state: &AdminState, auth: &str, page: PageRequest) -> ServiceResult<Paginated<Transfer>> {
    let auth = object_id(auth, "auth ID")?;
    state
        .stores
        .service
        .run(|c| transfers::by_auth(c, &auth, page))
        .await
        .map_err(failed("Failed to retrieve user transfers"))
}

pub async fn by_status(
    state: &AdminState,
    status: &str,
    page: PageRequest,
) -> ServiceResult<Paginated<Transfer>> {
    let status: TransferStatus = one_of(status, TransferStatus::accepted)?;
    state
        .stores
        .service
        .run(|c| transfers::by_status(c, status, page))
        .await
        .map_err(failed("Failed to retrieve transfers by status"))
}
