//! Retry sweep for missing critical assets.
//!
//! Runs when the host delivers a sync event with the retry tag, typically
//! after connectivity returns. One fetch attempt per missing asset, no
//! backoff; the host re-fires the sync on the next connectivity change.

use hexfolio_net::{Fetcher, Request};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::WorkerConfig;
use crate::store::{CacheEntry, CacheStorage};

/// Outcome of one retry sweep.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Missing assets that got a fetch attempt.
    pub checked: usize,
    /// URLs recovered into the asset store.
    pub recovered: Vec<String>,
    /// URLs still missing after this sweep.
    pub still_missing: Vec<String>,
}

/// Attempt to fetch every critical asset not already cached.
pub(crate) async fn run_sweep(
    storage: &RwLock<CacheStorage>,
    fetcher: &dyn Fetcher,
    config: &WorkerConfig,
) -> SweepReport {
    let store = config.asset_store_name();
    let mut report = SweepReport::default();

    for path in &config.critical_assets {
        let url = match config.resolve(path) {
            Ok(url) => url,
            Err(e) => {
                warn!(path = %path, error = %e, "unresolvable critical asset");
                report.still_missing.push(path.clone());
                continue;
            }
        };

        if storage.read().await.contains(&store, url.as_str()) {
            continue;
        }
        report.checked += 1;

        let request = Request::get(url.clone());
        match fetcher.fetch(&request).await {
            Ok(response) if response.ok() => {
                storage
                    .write()
                    .await
                    .put(&store, url.as_str(), CacheEntry::from_response(&response));
                report.recovered.push(url.to_string());
            }
            Ok(response) => {
                warn!(url = %url, status = %response.status, "retry fetch returned error status");
                report.still_missing.push(url.to_string());
            }
            Err(e) => {
                warn!(url = %url, error = %e, "retry fetch failed");
                report.still_missing.push(url.to_string());
            }
        }
    }

    info!(
        checked = report.checked,
        recovered = report.recovered.len(),
        still_missing = report.still_missing.len(),
        "retry sweep finished"
    );
    report
}
