//! Database migration system.
//!
//! Schema version stored in `PRAGMA user_version`. Migrations are
//! forward-only and applied per store.

use rusqlite::Connection;

use crate::{schema, DbError, Result, StoreKind, SCHEMA_VERSION};

/// Run all pending migrations for a store.
pub fn run(conn: &Connection, kind: StoreKind) -> Result<()> {
    let current_version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(DbError::Sqlite)?;

    if current_version == 0 {
        tracing::info!(store = %kind, "Initializing schema v{SCHEMA_VERSION}");
        conn.execute_batch(initial_schema(kind))
            .map_err(DbError::Sqlite)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(DbError::Sqlite)?;
    } else if current_version < SCHEMA_VERSION {
        for version in (current_version + 1)..=SCHEMA_VERSION {
            tracing::info!(store = %kind, "Running migration to v{version}");
            run_migration(conn, kind, version)?;
            conn.pragma_update(None, "user_version", version)
                .map_err(DbError::Sqlite)?;
        }
    } else if current_version > SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "{kind} version {current_version} is newer than supported {SCHEMA_VERSION}"
        )));
    }

    Ok(())
}

fn initial_schema(kind: StoreKind) -> &'static str {
    match kind {
        StoreKind::Auth => schema::AUTH_SCHEMA_V1,
        StoreKind::Service => schema::SERVICE_SCHEMA_V1,
        StoreKind::Dev => schema::DEV_SCHEMA_V1,
    }
}

fn run_migration(_conn: &Connection, kind: StoreKind, version: u32) -> Result<()> {
    Err(DbError::Migration(format!(
        "Unknown migration version for {kind}: {version}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .expect("prepare");
        stmt.query_map([], |row| row.get(0))
            .expect("query")
            .collect::<std::result::Result<Vec<String>, _>>()
            .expect("collect")
    }

    #[test]
    fn test_fresh_migration() {
        let conn = Connection::open_in_memory().expect("open");
        run(&conn, StoreKind::Auth).expect("migrate");

        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("version");
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_idempotent_migration() {
        let conn = Connection::open_in_memory().expect("open");
        run(&conn, StoreKind::Service).expect("first run");
        run(&conn, StoreKind::Service).expect("second run should be no-op");
    }

    #[test]
    fn test_newer_version_rejected() {
        let conn = Connection::open_in_memory().expect("open");
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .expect("bump");
        assert!(matches!(
            run(&conn, StoreKind::Dev),
            Err(DbError::Migration(_))
        ));
    }

    #[test]
    fn test_stores_own_disjoint_tables() {
        let auth = Connection::open_in_memory().expect("open");
        run(&auth, StoreKind::Auth).expect("migrate");
        assert_eq!(tables(&auth), vec!["users"]);

        let service = Connection::open_in_memory().expect("open");
        run(&service, StoreKind::Service).expect("migrate");
        assert_eq!(
            tables(&service),
            vec![
                "accounts",
                "interests",
                "payments",
                "rates",
                "stashes",
                "transactions",
                "transfers",
                "wallets",
            ]
        );

        let dev = Connection::open_in_memory().expect("open");
        run(&dev, StoreKind::Dev).expect("migrate");
        assert_eq!(
            tables(&dev),
            vec!["legacy_transactions", "legacy_user_statistics", "legacy_users"]
        );
    }
}
