//! Per-resource business logic.
//!
//! Each function validates its raw inputs, runs one or more store queries
//! and returns a typed value or a [`ServiceError`](crate::error::ServiceError).
//! Nothing in here knows about HTTP.

pub mod accounts;
pub mod dashboard;
pub mod health;
pub mod interests;
pub mod legacy_transactions;
pub mod legacy_users;
pub mod payments;
pub mod rates;
pub mod stashes;
pub mod transactions;
pub mod transfers;
pub mod users;
pub mod wallets;
