//! Synthetic responses generated by the worker.
//!
//! Two cases only: a placeholder graphic for image fetches that failed, and
//! a minimal offline page for a root-document fetch with no cached copy.
//! Both are marked `Cache-Control: no-cache` and are never written to a
//! store.

use bytes::Bytes;
use hashbrown::HashMap;

use crate::response::{ResponseSource, ServedResponse};

const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300" viewBox="0 0 400 300">
  <rect width="400" height="300" fill="#1a1a2e"/>
  <path d="M200 90 l52 30 v60 l-52 30 l-52 -30 v-60 z" fill="none" stroke="#4a4a6a" stroke-width="2"/>
  <text x="200" y="250" text-anchor="middle" fill="#8888aa" font-family="sans-serif" font-size="16">Image Unavailable</text>
</svg>"##;

const OFFLINE_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Hexfolio — Offline</title>
  <style>
    body { background: #1a1a2e; color: #e0e0f0; font-family: sans-serif; text-align: center; padding-top: 15vh; }
    button { background: #4a4a6a; color: #e0e0f0; border: none; padding: 0.75rem 2rem; cursor: pointer; }
  </style>
</head>
<body>
  <h1>You are offline</h1>
  <p>Hexfolio needs a connection for this page. Cached sections keep working.</p>
  <button onclick="location.reload()">Reload</button>
</body>
</html>
"#;

fn synthetic_headers(content_type: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("content-type".to_string(), content_type.to_string());
    headers.insert("cache-control".to_string(), "no-cache".to_string());
    headers
}

/// Placeholder graphic served when an image asset cannot be fetched.
pub fn placeholder_image(url: &str) -> ServedResponse {
    ServedResponse {
        url: url.to_string(),
        status: 200,
        headers: synthetic_headers("image/svg+xml"),
        body: Bytes::from_static(PLACEHOLDER_SVG.as_bytes()),
        source: ResponseSource::Synthetic,
    }
}

/// Offline page served when the root document misses both network and cache.
pub fn offline_page(url: &str) -> ServedResponse {
    ServedResponse {
        url: url.to_string(),
        status: 200,
        headers: synthetic_headers("text/html"),
        body: Bytes::from_static(OFFLINE_HTML.as_bytes()),
        source: ResponseSource::Synthetic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_image() {
        let served = placeholder_image("https://hexfolio.dev/assets/hex-lab.webp");

        assert_eq!(served.source, ResponseSource::Synthetic);
        assert_eq!(served.header("content-type"), Some("image/svg+xml"));
        assert_eq!(served.header("cache-control"), Some("no-cache"));
        assert!(served.text().contains("Image Unavailable"));
    }

    #[test]
    fn test_offline_page() {
        let served = offline_page("https://hexfolio.dev/");

        assert_eq!(served.source, ResponseSource::Synthetic);
        assert_eq!(served.header("content-type"), Some("text/html"));
        assert_eq!(served.header("cache-control"), Some("no-cache"));
        assert!(served.text().contains("You are offline"));
        assert!(served.text().contains("location.reload()"));
    }
}
