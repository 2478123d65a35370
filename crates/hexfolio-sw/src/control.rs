//! Control protocol between the page and the worker.
//!
//! The page drives the worker over a channel with typed messages; status
//! requests carry their own oneshot reply sender, the channel analogue of a
//! transferred message port. Dispatch is an exhaustive match, so an
//! unhandled message kind cannot exist.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// A command from the page to the worker.
#[derive(Debug)]
pub enum ControlMessage {
    /// Fetch and store one additional URL into the asset store.
    /// Fire-and-forget: errors are logged, never reported back.
    CacheAsset { url: String },

    /// Delete every cache store unconditionally.
    ClearCache,

    /// Compute a cache status snapshot and send it on the reply channel.
    /// A dropped receiver is a logged no-op.
    GetCacheStatus {
        reply: oneshot::Sender<CacheStatus>,
    },
}

/// Read-only snapshot of cache state, computed on demand.
///
/// Serializes with the field names the page-side script expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    /// Size of the critical asset list.
    pub total_assets: usize,

    /// How many critical assets are present in the asset store.
    pub cached_assets: usize,

    /// Every URL currently in the asset store.
    pub assets: Vec<String>,

    /// Last connectivity state reported to the worker.
    pub is_online: bool,
}
