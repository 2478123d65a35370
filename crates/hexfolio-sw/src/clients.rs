//! Controlled pages.
//!
//! A minimal registry of the pages this worker may control. Activation
//! claims every registered page so it is served by this worker without a
//! reload.

use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;
use url::Url;

/// Unique identifier for a client page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(u64);

impl ClientId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A page that can be controlled by the worker.
#[derive(Debug, Clone)]
pub struct Client {
    /// Client ID.
    pub id: ClientId,

    /// Page URL.
    pub url: Url,

    /// Whether this worker controls the page.
    pub controlled: bool,
}

/// Registry of open pages.
#[derive(Debug, Default)]
pub struct Clients {
    clients: HashMap<u64, Client>,
}

impl Clients {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly opened page. Uncontrolled until claimed.
    pub fn register(&mut self, url: Url) -> ClientId {
        let id = ClientId::new();
        self.clients.insert(
            id.raw(),
            Client {
                id,
                url,
                controlled: false,
            },
        );
        id
    }

    /// Get a client by ID.
    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id.raw())
    }

    /// Remove a closed page.
    pub fn remove(&mut self, id: ClientId) -> Option<Client> {
        self.clients.remove(&id.raw())
    }

    /// Claim control of every registered page. Returns the number claimed.
    pub fn claim(&mut self) -> usize {
        let mut claimed = 0;
        for client in self.clients.values_mut() {
            if !client.controlled {
                client.controlled = true;
                claimed += 1;
            }
        }
        claimed
    }

    /// Number of controlled pages.
    pub fn controlled_count(&self) -> usize {
        self.clients.values().filter(|c| c.controlled).count()
    }

    /// Total registered pages.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Check if no pages are registered.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
