//! Request classification and caching strategies.
//!
//! Static assets are immutable by filename, so a cache hit is always
//! correct and is served without revalidation. Documents must reflect the
//! latest deploy whenever the network is reachable, so they go network
//! first and only fall back to cache. Everything else is left to default
//! handling.
//!
//! Strategy selection is stateless: it depends only on the URL shape and
//! method, which is what makes lock-free concurrent handling safe.

use hexfolio_common::{HexfolioError, Result};
use hexfolio_net::{Fetcher, Request};
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::config::WorkerConfig;
use crate::response::ServedResponse;
use crate::store::{CacheEntry, CacheStorage};
use crate::synthetic;

/// How an intercepted request is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Versioned static asset, served cache-first.
    Asset,
    /// Document or app resource, served network-first.
    Document,
    /// Not intercepted (non-GET, other origin).
    Passthrough,
}

/// Result of handling a fetch event.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The worker produced a response.
    Respond(ServedResponse),
    /// Left to default browser handling.
    Passthrough,
}

/// Classify a request by URL shape and method.
pub fn classify(config: &WorkerConfig, request: &Request) -> RequestClass {
    if !request.is_get() {
        return RequestClass::Passthrough;
    }
    if request.url.origin() != config.origin.origin() {
        return RequestClass::Passthrough;
    }
    if config.is_asset_path(request.path()) {
        RequestClass::Asset
    } else {
        RequestClass::Document
    }
}

/// Cache-first with network fallback, for static assets.
pub(crate) async fn cache_first(
    storage: &RwLock<CacheStorage>,
    fetcher: &dyn Fetcher,
    config: &WorkerConfig,
    request: &Request,
) -> Result<ServedResponse> {
    let key = request.url.to_string();
    let store = config.asset_store_name();

    if let Some(entry) = storage.read().await.lookup(&store, &key) {
        trace!(url = %key, "asset cache hit");
        return Ok(ServedResponse::from_entry(&entry));
    }

    let failure = match fetcher.fetch(request).await {
        Ok(response) if response.ok() => {
            // Store a copy; the caller gets the response unchanged.
            storage
                .write()
                .await
                .put(&store, &key, CacheEntry::from_response(&response));
            debug!(url = %key, "asset fetched and cached");
            return Ok(ServedResponse::from_network(&response));
        }
        Ok(response) => {
            HexfolioError::network(format!("asset fetch returned {}", response.status))
        }
        Err(e) => HexfolioError::network_with_source(format!("asset fetch failed: {key}"), e),
    };

    if config.is_image_url(&request.url) {
        warn!(url = %key, error = %failure, "serving placeholder image");
        return Ok(synthetic::placeholder_image(&key));
    }

    Err(failure)
}

/// Network-first with cache fallback, for documents.
pub(crate) async fn network_first(
    storage: &RwLock<CacheStorage>,
    fetcher: &dyn Fetcher,
    config: &WorkerConfig,
    request: &Request,
) -> Result<ServedResponse> {
    let key = request.url.to_string();

    match fetcher.fetch(request).await {
        Ok(response) => {
            if response.ok() {
                storage.write().await.put(
                    &config.shell_store_name(),
                    &key,
                    CacheEntry::from_response(&response),
                );
            }
            Ok(ServedResponse::from_network(&response))
        }
        Err(e) => {
            if let Some(entry) = storage.read().await.lookup_any(&key) {
                debug!(url = %key, "network failed, serving cached document");
                return Ok(ServedResponse::from_entry(&entry));
            }
            if config.is_root_document(request.path()) {
                warn!(url = %key, "network and cache missed, serving offline page");
                return Ok(synthetic::offline_page(&key));
            }
            Err(HexfolioError::network_with_source(
                format!("document fetch failed: {key}"),
                e,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ResponseSource;
    use crate::testutil::MockFetcher;
    use http::Method;
    use url::Url;

    fn request(url: &str) -> Request {
        Request::get(Url::parse(url).unwrap())
    }

    #[test]
    fn test_classify_asset() {
        let config = WorkerConfig::default();
        let class = classify(&config, &request("https://hexfolio.dev/assets/hex-lab.webp"));
        assert_eq!(class, RequestClass::Asset);
    }

    #[test]
    fn test_classify_document() {
        let config = WorkerConfig::default();
        assert_eq!(
            classify(&config, &request("https://hexfolio.dev/")),
            RequestClass::Document
        );
        assert_eq!(
            classify(&config, &request("https://hexfolio.dev/about")),
            RequestClass::Document
        );
    }

    #[test]
    fn test_classify_passthrough_non_get() {
        let config = WorkerConfig::default();
        let req = Request::with_method(Method::POST, Url::parse("https://hexfolio.dev/").unwrap());
        assert_eq!(classify(&config, &req), RequestClass::Passthrough);
    }

    #[test]
    fn test_classify_passthrough_cross_origin() {
        let config = WorkerConfig::default();
        assert_eq!(
            classify(&config, &request("https://fonts.example.com/hex.woff2")),
            RequestClass::Passthrough
        );
    }

    #[tokio::test]
    async fn test_cache_first_hit_never_refetches() {
        let config = WorkerConfig::default();
        let storage = RwLock::new(CacheStorage::new());
        let fetcher = MockFetcher::new();
        let url = "https://hexfolio.dev/assets/hex-about.webp";
        fetcher.respond_ok(url, "image/webp", b"webp".to_vec());

        let served = cache_first(&storage, &fetcher, &config, &request(url))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Network);
        assert_eq!(fetcher.calls_for(url), 1);

        let served = cache_first(&storage, &fetcher, &config, &request(url))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Cache);
        assert_eq!(served.body, bytes::Bytes::from_static(b"webp"));
        // No second network round trip.
        assert_eq!(fetcher.calls_for(url), 1);
    }

    #[tokio::test]
    async fn test_cache_first_miss_stores_copy() {
        let config = WorkerConfig::default();
        let storage = RwLock::new(CacheStorage::new());
        let fetcher = MockFetcher::new();
        let url = "https://hexfolio.dev/assets/resume.pdf";
        fetcher.respond_ok(url, "application/pdf", b"pdf".to_vec());

        cache_first(&storage, &fetcher, &config, &request(url))
            .await
            .unwrap();

        let stored = storage
            .read()
            .await
            .lookup(&config.asset_store_name(), url)
            .unwrap();
        assert_eq!(stored.body, b"pdf");
    }

    #[tokio::test]
    async fn test_cache_first_image_failure_serves_placeholder() {
        let config = WorkerConfig::default();
        let storage = RwLock::new(CacheStorage::new());
        let fetcher = MockFetcher::new();
        let url = "https://hexfolio.dev/assets/hex-work.webp";
        fetcher.fail(url);

        let served = cache_first(&storage, &fetcher, &config, &request(url))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Synthetic);
        assert_eq!(served.header("content-type"), Some("image/svg+xml"));
        assert!(served.text().contains("Image Unavailable"));

        // Placeholders are never cached.
        assert!(storage
            .read()
            .await
            .lookup(&config.asset_store_name(), url)
            .is_none());
    }

    #[tokio::test]
    async fn test_cache_first_error_status_counts_as_failure() {
        let config = WorkerConfig::default();
        let storage = RwLock::new(CacheStorage::new());
        let fetcher = MockFetcher::new();
        let url = "https://hexfolio.dev/assets/og-card.png";
        fetcher.respond_status(url, 404);

        let served = cache_first(&storage, &fetcher, &config, &request(url))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Synthetic);
    }

    #[tokio::test]
    async fn test_cache_first_non_image_failure_propagates() {
        let config = WorkerConfig::default();
        let storage = RwLock::new(CacheStorage::new());
        let fetcher = MockFetcher::new();
        let url = "https://hexfolio.dev/assets/resume.pdf";
        fetcher.fail(url);

        let result = cache_first(&storage, &fetcher, &config, &request(url)).await;
        assert!(matches!(result, Err(HexfolioError::Network { .. })));
    }

    #[tokio::test]
    async fn test_network_first_prefers_fresh_content() {
        let config = WorkerConfig::default();
        let storage = RwLock::new(CacheStorage::new());
        let fetcher = MockFetcher::new();
        let url = "https://hexfolio.dev/";

        // Stale copy already cached.
        fetcher.respond_ok(url, "text/html", b"stale".to_vec());
        network_first(&storage, &fetcher, &config, &request(url))
            .await
            .unwrap();

        // Deploy happened; network has new content.
        fetcher.respond_ok(url, "text/html", b"fresh".to_vec());
        let served = network_first(&storage, &fetcher, &config, &request(url))
            .await
            .unwrap();

        assert_eq!(served.source, ResponseSource::Network);
        assert_eq!(served.body, bytes::Bytes::from_static(b"fresh"));
    }

    #[tokio::test]
    async fn test_network_first_falls_back_to_cache() {
        let config = WorkerConfig::default();
        let storage = RwLock::new(CacheStorage::new());
        let fetcher = MockFetcher::new();
        let url = "https://hexfolio.dev/about";

        fetcher.respond_ok(url, "text/html", b"about page".to_vec());
        network_first(&storage, &fetcher, &config, &request(url))
            .await
            .unwrap();

        fetcher.fail(url);
        let served = network_first(&storage, &fetcher, &config, &request(url))
            .await
            .unwrap();

        assert_eq!(served.source, ResponseSource::Cache);
        assert_eq!(served.body, bytes::Bytes::from_static(b"about page"));
    }

    #[tokio::test]
    async fn test_network_first_root_miss_serves_offline_page() {
        let config = WorkerConfig::default();
        let storage = RwLock::new(CacheStorage::new());
        let fetcher = MockFetcher::new();
        let url = "https://hexfolio.dev/";
        fetcher.fail(url);

        let served = network_first(&storage, &fetcher, &config, &request(url))
            .await
            .unwrap();

        assert_eq!(served.source, ResponseSource::Synthetic);
        assert!(served.text().contains("You are offline"));
    }

    #[tokio::test]
    async fn test_network_first_non_root_miss_propagates() {
        let config = WorkerConfig::default();
        let storage = RwLock::new(CacheStorage::new());
        let fetcher = MockFetcher::new();
        let url = "https://hexfolio.dev/lab";
        fetcher.fail(url);

        let result = network_first(&storage, &fetcher, &config, &request(url)).await;
        assert!(matches!(result, Err(HexfolioError::Network { .. })));
    }

    #[tokio::test]
    async fn test_network_first_does_not_cache_error_status() {
        let config = WorkerConfig::default();
        let storage = RwLock::new(CacheStorage::new());
        let fetcher = MockFetcher::new();
        let url = "https://hexfolio.dev/broken";
        fetcher.respond_status(url, 500);

        let served = network_first(&storage, &fetcher, &config, &request(url))
            .await
            .unwrap();
        assert_eq!(served.status, 500);

        assert!(storage.read().await.lookup_any(url).is_none());
    }
}
