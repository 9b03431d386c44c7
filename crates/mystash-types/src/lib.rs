//! # mystash-types
//!
//! Shared domain types for the MyStash admin API.
//!
//! Entities mirror the documents persisted by the onboarding, savings and
//! payments services across the auth, service and legacy stores. Reporting
//! shapes (dashboard rollups, per-user aggregates) and the two response
//! envelopes live here too so every crate serializes them identically.

pub mod enums;
pub mod envelope;
pub mod id;
pub mod legacy;
pub mod ledger;
pub mod reports;
pub mod savings;
pub mod user;
pub mod wallet;

pub use enums::ParseError;
pub use envelope::{ApiResponse, PageRequest, Paginated, Pagination, RecentSlice};
pub use id::{IdError, ObjectId};

/// Timestamp type used by every persisted record.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Default page number when the query omits or garbles it.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size when the query omits or garbles it.
pub const DEFAULT_LIMIT: u32 = 20;

/// Number of records shown per collection in a per-user aggregate.
pub const RECENT_LIMIT: u32 = 5;

/// Number of users listed under "recent users" on the dashboard.
pub const RECENT_USERS: u32 = 5;

/// Number of matured plans listed on the savings dashboard.
pub const MATURE_PLANS_LIMIT: u32 = 5;

/// Currencies reported in the fixed `{USD, NGN}` views.
pub const REPORTED_CURRENCIES: [&str; 2] = ["USD", "NGN"];

#[cfg(test)]
mod tests {
    #[test]
    #[ignore] // Run manually to generate bindings
    fn export_ts_bindings() {
        use ts_rs::TS;
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../bindings");
        std::fs::create_dir_all(&dir).expect("create bindings dir");
        crate::reports::DashboardAggregate::export_all_to(&dir).expect("export dashboard");
        crate::reports::SavingsAggregate::export_all_to(&dir).expect("export savings");
        crate::reports::SignupPoint::export_all_to(&dir).expect("export signup point");
    }
}
