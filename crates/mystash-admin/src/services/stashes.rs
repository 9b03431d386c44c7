//! Savings plans, optionally joined with their owners.

use chrono::Utc;
use mystash_db::queries::{stashes, users};
use mystash_types::enums::SaveType;
use mystash_types::savings::{Stash, StashDetail};
use mystash_types::user::{UserSummary, VerificationStats};
use mystash_types::{ObjectId, PageRequest, Paginated};
use serde::Serialize;

use crate::error::{failed, ServiceError, ServiceResult};
use crate::params::{object_id, object_id_opt, one_of};
use crate::resolver::UserResolver;
use crate::state::AdminState;

/// A detailed stash row that also carries the owner record itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnedStash {
    #[serde(flatten)]
    pub detail: StashDetail,
    pub user: Option<UserSummary>,
}

pub async fn list(state: &AdminState, page: PageRequest) -> ServiceResult<Paginated<Stash>> {
    state
        .stores
        .service
        .run(|c| stashes::list(c, page))
        .await
        .map_err(failed("Failed to retrieve stashes"))
}

pub async fn by_id(state: &AdminState, id: &str) -> ServiceResult<Stash> {
    let id = object_id(id, "stash ID")?;
    state
        .stores
        .service
        .run(|c| stashes::find_by_id(c, &id))
        .await
        .map_err(failed("Failed to retrieve stash"))?
        .ok_or_else(|| ServiceError::NotFound("Stash not found".into()))
}

pub async fn by_auth(state: &AdminState, auth: &str, page: PageRequest) -> ServiceResult<Paginated<Stash>> {
    let auth = object_id(auth, "auth ID")?;
    state
        .stores
        .service
        .run(|c| stashes::by_auth(c, &auth, page))
        .await
        .map_err(failed("Failed to retrieve user stashes"))
}

pub async fn by_save_type(
    state: &AdminState,
    save_type: &str,
    page: PageRequest,
) -> ServiceResult<(SaveType, Paginated<Stash>)> {
    let save_type: SaveType = one_of(save_type, SaveType::accepted)?;
    let found = state
        .stores
        .service
        .run(|c| stashes::by_save_type(c, save_type, page))
        .await
        .map_err(failed("Failed to retrieve stashes by save type"))?;
    Ok((save_type, found))
}

/// Stashes whose window contains the current instant.
pub async fn active(state: &AdminState, auth: Option<&str>) -> ServiceResult<Vec<Stash>> {
    let auth = object_id_opt(auth, "auth ID")?;
    let now = Utc::now();
    state
        .stores
        .service
        .run(|c| stashes::active(c, now, auth.as_ref()))
        .await
        .map_err(failed("Failed to retrieve active stashes"))
}

/// Verification counters over all platform users.
pub async fn stats(state: &AdminState) -> ServiceResult<VerificationStats> {
    state
        .stores
        .auth
        .run(users::verification_stats)
        .await
        .map_err(failed("Failed to retrieve user statistics"))
}

async fn with_owners(
    resolver: &impl UserResolver,
    page: Paginated<Stash>,
) -> mystash_db::Result<Paginated<OwnedStash>> {
    let auths: Vec<ObjectId> = page.data.iter().map(|s| s.auth).collect();
    let owners = resolver.resolve_many(&auths).await?;
    let now = Utc::now();
    Ok(page.map(|stash| {
        let user = owners.get(&stash.auth).cloned();
        OwnedStash {
            detail: StashDetail::new(stash, user.as_ref(), now),
            user,
        }
    }))
}

/// Every live stash with owner names and derived plan status.
pub async fn detailed(
    state: &AdminState,
    resolver: &impl UserResolver,
    page: PageRequest,
) -> ServiceResult<Paginated<StashDetail>> {
    let found = state
        .stores
        .service
        .run(|c| stashes::list(c, page))
        .await
        .map_err(failed("Failed to retrieve detailed stashes"))?;
    let owned = with_owners(resolver, found)
        .await
        .map_err(failed("Failed to retrieve detailed stashes"))?;
    Ok(owned.map(|row| row.detail))
}

/// One user's stashes with owner details.
pub async fn detailed_by_auth(
    state: &AdminState,
    resolver: &impl UserResolver,
    auth: &str,
    page: PageRequest,
) -> ServiceResult<Paginated<OwnedStash>> {
    let auth = object_id(auth, "auth ID")?;
    let found = state
        .stores
        .service
        .run(|c| stashes::by_auth(c, &auth, page))
        .await
        .map_err(failed("Failed to retrieve stashes"))?;
    with_owners(resolver, found)
        .await
        .map_err(failed("Failed to retrieve stashes"))
}
