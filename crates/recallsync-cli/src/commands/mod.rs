//! CLI command implementations

pub mod cards;
pub mod decks;
pub mod study;

use std::sync::Arc;

use anyhow::{Context as _, Result};

use recallsync_cache::CacheStore;
use recallsync_core::config::Config;
use recallsync_core::ports::RemoteGateway;
use recallsync_gateway::{ApiClient, HttpRemoteGateway};
use recallsync_sync::{MutationCoordinator, RefetchWorker};

/// Shared wiring every command needs: config, cache, gateway, coordinator
pub struct AppContext {
    pub config: Config,
    pub store: Arc<CacheStore>,
    pub gateway: Arc<dyn RemoteGateway>,
    pub coordinator: Arc<MutationCoordinator>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Loads the config and wires up the store, gateway, and coordinator
    pub fn init(config_path: Option<&str>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::load(std::path::Path::new(path))
                .with_context(|| format!("failed to load config from {path}"))?,
            None => Config::load_or_default(&Config::default_path()),
        };
        tracing::debug!(base_url = %config.api.base_url, "configuration loaded");

        let issues = config.validate();
        if !issues.is_empty() {
            let summary: Vec<String> = issues
                .iter()
                .map(|issue| format!("{}: {}", issue.field, issue.message))
                .collect();
            anyhow::bail!("invalid configuration: {}", summary.join("; "));
        }

        let client = ApiClient::new(&config.api)
            .map_err(|err| anyhow::anyhow!("failed to build API client: {err}"))?;
        let gateway: Arc<dyn RemoteGateway> = Arc::new(HttpRemoteGateway::new(client));
        let store = Arc::new(CacheStore::new(config.cache.clone()));
        let coordinator = Arc::new(MutationCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&gateway),
        ));

        Ok(Self {
            config,
            store,
            gateway,
            coordinator,
        })
    }

    /// Spawns the background worker that revalidates invalidated keys
    ///
    /// Must be called from within the tokio runtime. The worker stops
    /// when the store (and its queue sender) is dropped.
    pub fn spawn_refetch_worker(&self) {
        let queue = self.store.refetch_queue();
        let worker = RefetchWorker::new(
            Arc::clone(&self.store),
            Arc::clone(&self.gateway),
            self.config.study.clone(),
        );
        tokio::spawn(worker.run(queue));
    }
}
