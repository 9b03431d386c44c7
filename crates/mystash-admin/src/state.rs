//! Service-wide shared state.

use std::sync::Arc;
use std::time::Instant;

use mystash_db::StoreKind;
use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::config::AdminConfig;

/// One store connection.
///
/// Queries are synchronous; [`Store::run`] holds the lock for the duration
/// of one query function.
#[derive(Clone)]
pub struct Store {
    pub kind: StoreKind,
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn new(kind: StoreKind, conn: Connection) -> Self {
        Self {
            kind,
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run a query function against the connection.
    pub async fn run<T>(
        &self,
        f: impl FnOnce(&Connection) -> mystash_db::Result<T>,
    ) -> mystash_db::Result<T> {
        let conn = self.conn.lock().await;
        f(&conn)
    }
}

/// The three stores.
#[derive(Clone)]
pub struct Stores {
    pub auth: Store,
    pub service: Store,
    pub dev: Store,
}

impl Stores {
    pub fn all(&self) -> [&Store; 3] {
        [&self.auth, &self.service, &self.dev]
    }
}

/// Shared by every request handler.
pub struct AdminState {
    pub stores: Stores,
    pub config: AdminConfig,
    pub started_at: Instant,
}

impl AdminState {
    /// Open every store at its configured path.
    pub fn open(config: AdminConfig) -> mystash_db::Result<Self> {
        let open = |kind| -> mystash_db::Result<Store> {
            Ok(Store::new(kind, mystash_db::open(kind, &config.store_path(kind))?))
        };
        let stores = Stores {
            auth: open(StoreKind::Auth)?,
            service: open(StoreKind::Service)?,
            dev: open(StoreKind::Dev)?,
        };
        Ok(Self::with_stores(stores, config))
    }

    /// In-memory stores (for testing).
    pub fn in_memory(config: AdminConfig) -> mystash_db::Result<Self> {
        let open = |kind| -> mystash_db::Result<Store> {
            Ok(Store::new(kind, mystash_db::open_memory(kind)?))
        };
        let stores = Stores {
            auth: open(StoreKind::Auth)?,
            service: open(StoreKind::Service)?,
            dev: open(StoreKind::Dev)?,
        };
        Ok(Self::with_stores(stores, config))
    }

    pub fn with_stores(stores: Stores, config: AdminConfig) -> Self {
        Self {
            stores,
            config,
            started_at: Instant::now(),
        }
    }
}

pub type SharedState = Arc<AdminState>;
