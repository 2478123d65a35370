//! # Hexfolio Service Worker
//!
//! Offline cache worker for the Hexfolio portfolio application.
//!
//! ## Features
//!
//! - **Lifecycle**: install (seed shell + critical assets), activate
//!   (version garbage collection + client claiming)
//! - **Strategies**: cache-first for versioned static assets,
//!   network-first for documents, passthrough for everything else
//! - **Control protocol**: typed messages for caching extra assets,
//!   clearing all stores, and introspecting cache status
//! - **Retry sweep**: one-shot re-fetch of critical assets still missing
//!   when connectivity returns
//!
//! ## Architecture
//!
//! ```text
//! CacheWorker
//!     ├── CacheStorage
//!     │       ├── "<app>-v<tag>"         (shell store)
//!     │       └── "<app>-assets-v<tag>"  (asset store)
//!     ├── Clients (controlled pages)
//!     └── dyn Fetcher (network seam)
//!
//! host ──fetch events──▶ handle_fetch ──▶ FetchOutcome
//! page ──ControlMessage─▶ handle_message (oneshot reply for status)
//! host ──sync event─────▶ handle_sync ──▶ SweepReport
//! ```

pub mod clients;
pub mod config;
pub mod control;
pub mod lifecycle;
pub mod response;
pub mod store;
pub mod strategy;
pub mod sweep;
pub mod synthetic;
pub mod worker;

#[cfg(test)]
pub(crate) mod testutil;

pub use clients::{Client, ClientId, Clients};
pub use config::WorkerConfig;
pub use control::{CacheStatus, ControlMessage};
pub use lifecycle::{InstallReport, WorkerEvent, WorkerState};
pub use response::{ResponseSource, ServedResponse};
pub use store::{CacheEntry, CacheStorage, CacheStore};
pub use strategy::{FetchOutcome, RequestClass};
pub use sweep::SweepReport;
pub use worker::CacheWorker;
