//! Payment rail registrations.

use mystash_db::queries::accounts;
use mystash_types::wallet::Account;
use mystash_types::{PageRequest, Paginated};

use crate::error::{failed, ServiceError, ServiceResult};
use crate::params::object_id;
use crate::state::AdminState;

pub async fn list(state: &AdminState, page: PageRequest) -> ServiceResult<Paginated<Account>> {
    state
        .stores
        .service
        .run(|c| accounts::list(c, page))
        .await
        .map_err(failed("Failed to retrieve accounts"))
}

pub async fn by_id(state: &AdminState, id: &str) -> ServiceResult<Account> {
    let id = object_id(id, "account ID")?;
    state
        .stores
        .service
        .run(|c| accounts::find_by_id(c, &id))
        .await
        .map_err(failed("Failed to retrieve account"))?
        .ok_or_else(|| ServiceError::NotFound("Account not found".into()))
}
