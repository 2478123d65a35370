//! Responses served to intercepted requests.

use bytes::Bytes;
use hashbrown::HashMap;
use hexfolio_net::Response;

use crate::store::CacheEntry;

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    /// Fresh from the network.
    Network,
    /// Replayed from a cache store.
    Cache,
    /// Generated by the worker (placeholder image, offline page).
    Synthetic,
}

/// A response handed back to the requesting page.
#[derive(Debug, Clone)]
pub struct ServedResponse {
    /// Request URL.
    pub url: String,

    /// Status code.
    pub status: u16,

    /// Response headers.
    pub headers: HashMap<String, String>,

    /// Response body.
    pub body: Bytes,

    /// Origin of the response.
    pub source: ResponseSource,
}

impl ServedResponse {
    /// Wrap a network response. The caller receives the same status,
    /// headers, and body the network produced.
    pub fn from_network(response: &Response) -> Self {
        let mut headers = HashMap::new();
        for (name, value) in response.headers.iter() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_string(), v.to_string());
            }
        }

        Self {
            url: response.url.to_string(),
            status: response.status.as_u16(),
            headers,
            body: response.body.clone(),
            source: ResponseSource::Network,
        }
    }

    /// Replay a cache entry.
    pub fn from_entry(entry: &CacheEntry) -> Self {
        Self {
            url: entry.url.clone(),
            status: entry.status,
            headers: entry.headers.clone(),
            body: entry.body_bytes(),
            source: ResponseSource::Cache,
        }
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|v| v.as_str())
    }

    /// Get the body as text (lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
