//! Liveness and store connectivity reports.

use std::collections::BTreeMap;

use chrono::Utc;
use mystash_db::StoreKind;
use mystash_types::Timestamp;
use serde::Serialize;
use tracing::warn;

use crate::state::AdminState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    pub timestamp: Timestamp,
    /// Seconds since the service started.
    pub uptime: f64,
    pub environment: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealth {
    #[serde(flatten)]
    pub health: Health,
    pub version: &'static str,
    pub pid: u32,
    pub databases: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreState {
    pub state: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseHealth {
    pub status: &'static str,
    pub timestamp: Timestamp,
    pub databases: BTreeMap<&'static str, StoreState>,
    pub connection_states: BTreeMap<&'static str, &'static str>,
}

pub fn health(state: &AdminState) -> Health {
    Health {
        status: "ok",
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.config.server.environment.clone(),
    }
}

pub fn detailed(state: &AdminState) -> DetailedHealth {
    DetailedHealth {
        health: health(state),
        version: env!("CARGO_PKG_VERSION"),
        pid: std::process::id(),
        databases: state.stores.all().iter().map(|s| s.kind.name()).collect(),
    }
}

fn response_key(kind: StoreKind) -> &'static str {
    match kind {
        StoreKind::Auth => "authDb",
        StoreKind::Service => "serviceDb",
        StoreKind::Dev => "devDb",
    }
}

/// Ping every store. Status is `degraded` when any ping fails.
pub async fn database(state: &AdminState) -> DatabaseHealth {
    let mut databases = BTreeMap::new();
    let mut connection_states = BTreeMap::new();
    let mut healthy = true;
    for store in state.stores.all() {
        let name = store.kind.name();
        let connection = match store.run(mystash_db::ping).await {
            Ok(()) => "connected",
            Err(e) => {
                warn!(store = name, error = %e, "store ping failed");
                healthy = false;
                "disconnected"
            }
        };
        databases.insert(response_key(store.kind), StoreState { state: connection, name });
        connection_states.insert(name, connection);
    }
    DatabaseHealth {
        status: if healthy { "ok" } else { "degraded" },
        timestamp: Utc::now(),
        databases,
        connection_states,
    }
}
