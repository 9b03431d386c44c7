//! # mystash-db
//!
//! Data access layer for the MyStash admin API.
//!
//! Three independent SQLite stores, each owning disjoint tables:
//! - `auth`: platform users
//! - `service`: accounts, wallets, stashes, transactions, payments,
//!   transfers, rates and interest schedules
//! - `dev`: legacy users, their statistics and legacy transactions
//!
//! No query ever spans two stores. Records refer across stores through the
//! opaque `auth` identity, which nothing here enforces.
//!
//! ## Conventions
//!
//! - WAL mode, busy timeout of five seconds
//! - Timestamps are Unix epoch milliseconds
//! - Record identities are 24-character hex strings
//! - Nested documents are JSON text columns
//! - Every table carries a `deleted` tombstone; reads go through
//!   [`filter::Filter`], which cannot be built without excluding it
//! - Schema version stored in `PRAGMA user_version`

pub mod columns;
pub mod filter;
pub mod migrations;
pub mod queries;
pub mod schema;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

use std::fmt;
use std::path::Path;

use rusqlite::Connection;

pub use filter::Filter;

/// Current schema version, shared by all three stores.
pub const SCHEMA_VERSION: u32 = 1;

/// Which of the three stores a connection holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Auth,
    Service,
    Dev,
}

impl StoreKind {
    pub const ALL: [StoreKind; 3] = [StoreKind::Auth, StoreKind::Service, StoreKind::Dev];

    pub fn name(self) -> &'static str {
        match self {
            StoreKind::Auth => "auth-db",
            StoreKind::Service => "service-db",
            StoreKind::Dev => "dev-db",
        }
    }

    /// File name used when no explicit path is configured.
    pub fn file_name(self) -> &'static str {
        match self {
            StoreKind::Auth => "auth.db",
            StoreKind::Service => "service.db",
            StoreKind::Dev => "dev.db",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open or create a store at the given path and bring its schema up to date.
pub fn open(kind: StoreKind, path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn, kind)?;
    Ok(conn)
}

/// Open an in-memory store (for testing).
pub fn open_memory(kind: StoreKind) -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn, kind)?;
    Ok(conn)
}

/// Cheap round trip used by health checks.
pub fn ping(conn: &Connection) -> Result<()> {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;
         PRAGMA cache_size = -8000;",
    )?;
    Ok(())
}
