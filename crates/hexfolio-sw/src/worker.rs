//! The cache worker.
//!
//! Owns the cache stores and the client registry; everything else reaches
//! cache state through intercepted fetches ([`CacheWorker::handle_fetch`])
//! or control messages ([`CacheWorker::handle_message`]). That isolation is
//! what keeps the cache consistent across reloads and multiple open tabs
//! sharing one worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hexfolio_common::{HexfolioError, Result};
use hexfolio_net::{Fetcher, Request};
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};
use url::Url;

use crate::clients::{ClientId, Clients};
use crate::config::WorkerConfig;
use crate::control::{CacheStatus, ControlMessage};
use crate::lifecycle::{InstallReport, WorkerEvent, WorkerState};
use crate::store::{CacheEntry, CacheStorage};
use crate::strategy::{self, FetchOutcome, RequestClass};
use crate::sweep::{self, SweepReport};

/// Offline cache worker for one origin.
pub struct CacheWorker {
    config: WorkerConfig,
    storage: RwLock<CacheStorage>,
    clients: RwLock<Clients>,
    fetcher: Arc<dyn Fetcher>,
    state: RwLock<WorkerState>,
    online: AtomicBool,
    event_tx: mpsc::UnboundedSender<WorkerEvent>,
}

impl CacheWorker {
    /// Create a new worker. Returns the worker and a receiver for
    /// lifecycle events.
    pub fn new(
        config: WorkerConfig,
        fetcher: Arc<dyn Fetcher>,
    ) -> (Self, mpsc::UnboundedReceiver<WorkerEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (
            Self {
                config,
                storage: RwLock::new(CacheStorage::new()),
                clients: RwLock::new(Clients::new()),
                fetcher,
                state: RwLock::new(WorkerState::Parsed),
                online: AtomicBool::new(true),
                event_tx,
            },
            event_rx,
        )
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    /// Worker configuration.
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Record the host-reported connectivity state.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }

    /// Last connectivity state reported.
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    /// Register an open page. Uncontrolled until activation claims it.
    pub async fn register_client(&self, url: Url) -> ClientId {
        self.clients.write().await.register(url)
    }

    /// Remove a closed page.
    pub async fn remove_client(&self, id: ClientId) {
        self.clients.write().await.remove(id);
    }

    async fn transition(&self, to: WorkerState) {
        let mut state = self.state.write().await;
        let from = *state;
        *state = to;
        debug!(%from, %to, "worker state change");
        let _ = self.event_tx.send(WorkerEvent::StateChange { from, to });
    }

    fn resolve_url(&self, raw: &str) -> Result<Url> {
        match Url::parse(raw) {
            Ok(url) => Ok(url),
            Err(_) => self.config.resolve(raw),
        }
    }

    /// Fetch a URL and store the captured response into a named store.
    async fn fetch_and_store(&self, store: &str, url: &Url) -> Result<()> {
        let request = Request::get(url.clone());
        let response = self
            .fetcher
            .fetch(&request)
            .await
            .map_err(|e| HexfolioError::network_with_source(format!("fetch failed: {url}"), e))?;
        if !response.ok() {
            return Err(HexfolioError::network(format!(
                "fetch of {url} returned {}",
                response.status
            )));
        }
        self.storage
            .write()
            .await
            .put(store, url.as_str(), CacheEntry::from_response(&response));
        Ok(())
    }

    /// Install: open both stores, seed the shell document, then attempt
    /// every critical asset with all-settled semantics. Individual failures
    /// are logged and never fail the step. The waiting period is skipped,
    /// so the worker is eligible for activation as soon as this returns.
    pub async fn install(&self) -> Result<InstallReport> {
        self.transition(WorkerState::Installing).await;

        let shell_store = self.config.shell_store_name();
        let asset_store = self.config.asset_store_name();
        {
            let mut storage = self.storage.write().await;
            storage.open(&shell_store);
            storage.open(&asset_store);
        }

        let mut report = InstallReport {
            attempted: self.config.critical_assets.len(),
            ..Default::default()
        };

        match self.config.resolve(&self.config.root_document) {
            Ok(url) => match self.fetch_and_store(&shell_store, &url).await {
                Ok(()) => {
                    report.shell_seeded = true;
                    debug!(url = %url, "shell document seeded");
                }
                Err(e) => warn!(url = %url, error = %e, "shell document seeding failed"),
            },
            Err(e) => warn!(error = %e, "cannot resolve root document"),
        }

        for path in &self.config.critical_assets {
            let url = match self.resolve_url(path) {
                Ok(url) => url,
                Err(e) => {
                    warn!(path = %path, error = %e, "unresolvable critical asset");
                    report.failed.push(path.clone());
                    continue;
                }
            };
            match self.fetch_and_store(&asset_store, &url).await {
                Ok(()) => report.cached.push(url.to_string()),
                Err(e) => {
                    warn!(url = %url, error = %e, "critical asset failed to cache");
                    report.failed.push(path.clone());
                }
            }
        }

        self.transition(WorkerState::Installed).await;
        let _ = self.event_tx.send(WorkerEvent::InstallCompleted {
            cached: report.cached.len(),
            failed: report.failed.len(),
        });
        info!(
            cached = report.cached.len(),
            failed = report.failed.len(),
            "install complete"
        );
        Ok(report)
    }

    /// Activate: delete every store from a prior version tag, then claim
    /// all registered pages.
    pub async fn activate(&self) -> Result<()> {
        self.transition(WorkerState::Activating).await;

        {
            let mut storage = self.storage.write().await;
            for name in storage.keys() {
                if !self.config.is_current_store(&name) {
                    storage.delete(&name);
                    info!(store = %name, "deleted stale cache store");
                }
            }
        }

        let claimed = self.clients.write().await.claim();
        let _ = self.event_tx.send(WorkerEvent::ClientsClaimed { count: claimed });

        self.transition(WorkerState::Activated).await;
        info!(claimed, "worker activated");
        Ok(())
    }

    /// Handle an intercepted request.
    pub async fn handle_fetch(&self, request: &Request) -> Result<FetchOutcome> {
        match strategy::classify(&self.config, request) {
            RequestClass::Passthrough => Ok(FetchOutcome::Passthrough),
            RequestClass::Asset => {
                strategy::cache_first(&self.storage, self.fetcher.as_ref(), &self.config, request)
                    .await
                    .map(FetchOutcome::Respond)
            }
            RequestClass::Document => {
                strategy::network_first(&self.storage, self.fetcher.as_ref(), &self.config, request)
                    .await
                    .map(FetchOutcome::Respond)
            }
        }
    }

    /// Handle a sync event. Runs the retry sweep when the tag matches;
    /// other tags are ignored.
    pub async fn handle_sync(&self, tag: &str) -> Option<SweepReport> {
        if tag != self.config.retry_sync_tag {
            debug!(tag, "ignoring sync event with unknown tag");
            return None;
        }
        Some(sweep::run_sweep(&self.storage, self.fetcher.as_ref(), &self.config).await)
    }

    /// Handle one control message. Failures are logged and never
    /// propagated; the worker must not crash on a bad message.
    pub async fn handle_message(&self, message: ControlMessage) {
        match message {
            ControlMessage::CacheAsset { url } => {
                let resolved = match self.resolve_url(&url) {
                    Ok(resolved) => resolved,
                    Err(e) => {
                        warn!(url = %url, error = %e, "cache_asset: bad URL");
                        return;
                    }
                };
                let store = self.config.asset_store_name();
                if let Err(e) = self.fetch_and_store(&store, &resolved).await {
                    warn!(url = %resolved, error = %e, "cache_asset failed");
                }
            }
            ControlMessage::ClearCache => {
                let mut storage = self.storage.write().await;
                for name in storage.keys() {
                    storage.delete(&name);
                }
                info!("all cache stores cleared");
            }
            ControlMessage::GetCacheStatus { reply } => {
                let status = self.status().await;
                if reply.send(status).is_err() {
                    debug!("status reply port dropped before delivery");
                }
            }
        }
    }

    /// Drive the worker from a control channel until the sender closes.
    pub async fn serve(&self, mut rx: mpsc::UnboundedReceiver<ControlMessage>) {
        while let Some(message) = rx.recv().await {
            self.handle_message(message).await;
        }
        debug!("control channel closed");
    }

    /// Compute a cache status snapshot.
    pub async fn status(&self) -> CacheStatus {
        let storage = self.storage.read().await;
        let store = self.config.asset_store_name();

        let cached_assets = self
            .config
            .critical_assets
            .iter()
            .filter(|path| {
                self.config
                    .resolve(path)
                    .map(|url| storage.contains(&store, url.as_str()))
                    .unwrap_or(false)
            })
            .count();

        CacheStatus {
            total_assets: self.config.critical_assets.len(),
            cached_assets,
            assets: storage.store_keys(&store),
            is_online: self.is_online(),
        }
    }
}
