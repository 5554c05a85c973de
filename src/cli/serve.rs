//! HTTP API server command

use super::helpers::open_store;
use std::net::SocketAddr;
use tracing::{info, warn};
use tripmatch_core::{
    api::{ApiServer, ApiServerConfig, AppState},
    catalog, TripmatchConfig,
};

/// Handle `serve`
pub async fn handle(
    db_path: &str,
    config: &TripmatchConfig,
    addr: Option<String>,
    seed: bool,
) -> anyhow::Result<()> {
    let mut server_config = ApiServerConfig::from(config.server.clone());
    if let Some(addr) = addr {
        server_config.addr = addr
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("Invalid address '{}': {}", addr, e))?;
    }

    let store = open_store(db_path).await?;
    if seed {
        let report = catalog::seed_demo(store.as_ref()).await?;
        if report.trips > 0 {
            info!("Loaded demo catalog ({} trips)", report.trips);
        }
    }

    match store.count_trips().await? {
        0 => warn!("Catalog is empty; recommendations will fail until trips are imported"),
        n => info!("Serving catalog of {} trip(s) from {}", n, db_path),
    }

    let state = AppState::new(store, config);
    ApiServer::new(server_config, state).serve().await
}
