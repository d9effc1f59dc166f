use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ocvault::{BackendConfig, MemoryStore, RemoteCacheStore, SharedStorage, SledStore, VaultConfig};
use ocvault_server::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = VaultConfig::from_env();

    let backend: Option<SharedStorage> = match &config.backend {
        BackendConfig::Memory => Some(Arc::new(MemoryStore::new())),
        BackendConfig::Sled { path } => Some(Arc::new(SledStore::open(path)?)),
        BackendConfig::Remote { url } => Some(Arc::new(RemoteCacheStore::new(url.clone()))),
        BackendConfig::Disabled => {
            tracing::warn!("no backing store configured, running in degraded mode");
            None
        }
    };

    let listen = config.listen.clone();
    tracing::info!(backend = ?config.backend, %listen, "starting vault server");

    let router = app(AppState::new(config, backend));
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
