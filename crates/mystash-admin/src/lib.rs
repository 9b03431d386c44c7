//! mystash-admin: the MyStash administrative and reporting API.
//!
//! A read-mostly HTTP service over three stores (auth, service, legacy).
//! Routes delegate to services, services run store queries and shape the
//! results; all of it shares one [`state::AdminState`].

pub mod config;
pub mod error;
pub mod middleware;
pub mod params;
pub mod resolver;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::router;
