//! mystash-admin binary: load config, open the stores, serve HTTP.

use std::sync::Arc;

use mystash_admin::config::AdminConfig;
use mystash_admin::state::AdminState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AdminConfig::load()?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("mystash={}", config.logging.level)))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(environment = %config.server.environment, "MyStash admin API starting");

    std::fs::create_dir_all(config.data_dir())?;
    let addr = config.bind_addr();
    let state = Arc::new(AdminState::open(config)?);
    for store in state.stores.all() {
        info!(store = %store.kind, "store opened");
    }

    let app = mystash_admin::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, prefix = %state.config.server.prefix, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, shutting down");
            }
        })
        .await?;

    info!("MyStash admin API stopped");
    Ok(())
}
