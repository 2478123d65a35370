//! Worker configuration.

use hexfolio_common::{HexfolioError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the cache worker.
///
/// The critical asset list and version tag are produced by the build
/// pipeline; the worker only consumes them. Bumping `version` is the sole
/// mechanism for invalidating previously cached content on deploy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Application name, used as the cache store name prefix.
    pub app_name: String,

    /// Version tag embedded in store names.
    pub version: u32,

    /// Origin this worker is scoped to.
    pub origin: Url,

    /// Path prefix for versioned static assets.
    pub asset_root: String,

    /// Root document path (the app shell).
    pub root_document: String,

    /// Root-relative paths mandatory for offline operation.
    pub critical_assets: Vec<String>,

    /// Extensions that get a synthetic placeholder on fetch failure.
    pub image_extensions: Vec<String>,

    /// Sync tag that triggers the retry sweep.
    pub retry_sync_tag: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            app_name: "hexfolio".to_string(),
            version: 1,
            origin: Url::parse("https://hexfolio.dev").expect("static origin URL"),
            asset_root: "/assets/".to_string(),
            root_document: "/".to_string(),
            critical_assets: vec![
                "/assets/hex-about.webp".to_string(),
                "/assets/hex-work.webp".to_string(),
                "/assets/hex-lab.webp".to_string(),
                "/assets/hex-contact.webp".to_string(),
                "/assets/og-card.png".to_string(),
                "/assets/resume.pdf".to_string(),
            ],
            image_extensions: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "webp".to_string(),
                "gif".to_string(),
                "svg".to_string(),
                "avif".to_string(),
            ],
            retry_sync_tag: "retry-failed-assets".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Name of the app shell store for the current version.
    pub fn shell_store_name(&self) -> String {
        format!("{}-v{}", self.app_name, self.version)
    }

    /// Name of the asset store for the current version.
    pub fn asset_store_name(&self) -> String {
        format!("{}-assets-v{}", self.app_name, self.version)
    }

    /// Check whether a store name belongs to the current version.
    pub fn is_current_store(&self, name: &str) -> bool {
        name == self.shell_store_name() || name == self.asset_store_name()
    }

    /// Check whether a path falls under the asset root.
    pub fn is_asset_path(&self, path: &str) -> bool {
        path.starts_with(&self.asset_root)
    }

    /// Check whether a path is the root document.
    pub fn is_root_document(&self, path: &str) -> bool {
        path == self.root_document
    }

    /// Check whether a URL names an image by extension.
    pub fn is_image_url(&self, url: &Url) -> bool {
        let path = url.path();
        match path.rsplit_once('.') {
            Some((_, ext)) => {
                let ext = ext.to_ascii_lowercase();
                self.image_extensions.iter().any(|e| *e == ext)
            }
            None => false,
        }
    }

    /// Resolve a root-relative path against the worker origin.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.origin
            .join(path)
            .map_err(|e| HexfolioError::config(format!("cannot resolve {path}: {e}")))
    }
}
