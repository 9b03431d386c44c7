//! Per-currency balances.

use mystash_db::queries::wallets;
use mystash_types::wallet::Wallet;
use mystash_types::{PageRequest, Paginated};

use crate::error::{failed, ServiceError, ServiceResult};
use crate::params::object_id;
use crate::state::AdminState;

pub async fn list(state: &AdminState, page: PageRequest) -> ServiceResult<Paginated<Wallet>> {
    state
        .stores
        .service
        .run(|c| wallets::list(c, page))
        .await
        .map_err(failed("Failed to retrieve wallets"))
}

pub async fn by_id(state: &AdminState, id: &str) -> ServiceResult<Wallet> {
    let id = object_id(id, "wallet ID")?;
    state
        .stores
        .service
        .run(|c| wallets::find_by_id(c, &id))
        .await
        .map_err(failed("Failed to retrieve wallet"))?
        .ok_or_else(|| ServiceError::NotFound("Wallet not found".into()))
}

pub async fn by_auth(state: &AdminState, auth: &str, page: PageRequest) -> ServiceResult<Paginated<Wallet>> {
    let auth = object_id(auth, "auth ID")?;
    state
        .stores
        .service
        .run(|c| wallets::by_auth(c, &auth, page))
        .await
        .map_err(failed("Failed to retrieve user wallets"))
}
