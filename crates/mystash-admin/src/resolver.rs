//! Cross-store owner lookup.
//!
//! Service-store records name their owner by `auth` identity only. There
//! is no join across stores, so owners are fetched in a second query and
//! matched in memory. Unknown identities resolve to nothing.

use std::collections::HashMap;
use std::future::Future;

use mystash_db::queries::users;
use mystash_types::user::UserSummary;
use mystash_types::ObjectId;

use crate::state::Store;

/// Resolves `auth` identities to owner summaries.
pub trait UserResolver {
    /// Summaries keyed by `auth`. Identities with no live user are absent.
    fn resolve_many(
        &self,
        auths: &[ObjectId],
    ) -> impl Future<Output = mystash_db::Result<HashMap<ObjectId, UserSummary>>> + Send;

    /// One owner, or `None` when the reference dangles.
    fn resolve(
        &self,
        auth: ObjectId,
    ) -> impl Future<Output = mystash_db::Result<Option<UserSummary>>> + Send
    where
        Self: Sync,
    {
        async move { Ok(self.resolve_many(&[auth]).await?.remove(&auth)) }
    }
}

/// Resolver backed by the auth store.
#[derive(Clone)]
pub struct AuthStoreResolver {
    store: Store,
}

impl AuthStoreResolver {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl UserResolver for AuthStoreResolver {
    fn resolve_many(
        &self,
        auths: &[ObjectId],
    ) -> impl Future<Output = mystash_db::Result<HashMap<ObjectId, UserSummary>>> + Send {
        let mut wanted = auths.to_vec();
        wanted.sort_unstable();
        wanted.dedup();
        let store = self.store.clone();
        async move {
            let found = store.run(|conn| users::find_by_auths(conn, &wanted)).await?;
            Ok(found.iter().map(|u| (u.auth, UserSummary::from(u))).collect())
        }
    }
}
