//! Versioned cache stores.
//!
//! A [`CacheStore`] is a named key→response mapping; its name embeds the
//! version tag. [`CacheStorage`] holds all stores and is the only shared
//! mutable state in the worker. Callers take store *names*, not handles:
//! every operation opens, uses, and discards the store within a single
//! storage borrow, so no handle ever outlives a lock acquisition.

use bytes::Bytes;
use hashbrown::HashMap;
use hexfolio_net::Response;
use serde::{Deserialize, Serialize};

/// A captured response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Request URL.
    pub url: String,

    /// Request method.
    pub method: String,

    /// Response status.
    pub status: u16,

    /// Response headers.
    pub headers: HashMap<String, String>,

    /// Response body snapshot.
    pub body: Vec<u8>,

    /// Cached at timestamp (ms since epoch).
    pub cached_at: u64,
}

impl CacheEntry {
    /// Capture a fetched response.
    pub fn from_response(response: &Response) -> Self {
        let mut headers = HashMap::new();
        for (name, value) in response.headers.iter() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_string(), v.to_string());
            }
        }

        Self {
            url: response.url.to_string(),
            method: "GET".to_string(),
            status: response.status.as_u16(),
            headers,
            body: response.body.to_vec(),
            cached_at: now_ms(),
        }
    }

    /// Get the body as bytes.
    pub fn body_bytes(&self) -> Bytes {
        Bytes::from(self.body.clone())
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// A single named store.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Store name (carries the version tag).
    pub name: String,

    entries: HashMap<String, CacheEntry>,
}

impl CacheStore {
    /// Create a new store.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: HashMap::new(),
        }
    }

    /// Look up an entry by URL.
    pub fn match_request(&self, url: &str) -> Option<&CacheEntry> {
        self.entries.get(url)
    }

    /// Check whether a URL is present.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Insert an entry. Last write wins.
    pub fn put(&mut self, url: &str, entry: CacheEntry) {
        self.entries.insert(url.to_string(), entry);
    }

    /// Delete an entry.
    pub fn delete(&mut self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    /// All cached URLs, sorted for deterministic iteration.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All cache stores owned by the worker.
#[derive(Debug, Default)]
pub struct CacheStorage {
    stores: HashMap<String, CacheStore>,
}

impl CacheStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store by name, creating it if absent.
    pub fn open(&mut self, name: &str) -> &mut CacheStore {
        self.stores
            .entry(name.to_string())
            .or_insert_with(|| CacheStore::new(name))
    }

    /// Check if a store exists.
    pub fn has(&self, name: &str) -> bool {
        self.stores.contains_key(name)
    }

    /// Delete a store wholesale.
    pub fn delete(&mut self, name: &str) -> bool {
        self.stores.remove(name).is_some()
    }

    /// All store names, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.stores.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Insert an entry into a named store, creating the store if absent.
    pub fn put(&mut self, store: &str, url: &str, entry: CacheEntry) {
        self.open(store).put(url, entry);
    }

    /// Look up a URL in one named store, cloning the entry out.
    pub fn lookup(&self, store: &str, url: &str) -> Option<CacheEntry> {
        self.stores
            .get(store)
            .and_then(|s| s.match_request(url))
            .cloned()
    }

    /// Check whether a URL is present in a named store.
    pub fn contains(&self, store: &str, url: &str) -> bool {
        self.stores.get(store).is_some_and(|s| s.contains(url))
    }

    /// Look up a URL across all stores.
    pub fn lookup_any(&self, url: &str) -> Option<CacheEntry> {
        self.stores
            .values()
            .find_map(|s| s.match_request(url))
            .cloned()
    }

    /// URLs present in a named store, or empty if the store is absent.
    pub fn store_keys(&self, store: &str) -> Vec<String> {
        self.stores.get(store).map(|s| s.keys()).unwrap_or_default()
    }
}
