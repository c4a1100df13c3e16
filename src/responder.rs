//! HTML page rendering with bridge injection

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use webui_inject_utils::inject_inline_script;

use crate::bridge::{build_bridge_script, BridgeSnapshot};
use crate::catalog::Catalog;
use crate::error::{PreviewError, Result};
use crate::merge::merge_overrides;
use crate::overrides::OverrideLoader;

/// Extension a page must carry to be served through the responder.
pub const HTML_EXTENSION: &str = ".html";

/// Serves HTML pages from the asset root with the mock bridge spliced in.
#[derive(Debug, Clone)]
pub struct PageResponder {
    web_dir: PathBuf,
    catalog: Arc<Catalog>,
    loader: OverrideLoader,
    apply_overrides: bool,
    build_info: String,
}

impl PageResponder {
    pub fn new(
        web_dir: impl Into<PathBuf>,
        catalog: Arc<Catalog>,
        loader: OverrideLoader,
        build_info: impl Into<String>,
    ) -> Self {
        Self {
            web_dir: web_dir.into(),
            catalog,
            loader,
            apply_overrides: false,
            build_info: build_info.into(),
        }
    }

    /// Merge the override file into module metadata before it reaches the bridge.
    pub fn with_overrides(mut self, enabled: bool) -> Self {
        self.apply_overrides = enabled;
        self
    }

    /// Resolve `filename` to a page inside the asset root.
    ///
    /// Anything that is not an existing `.html` file under the canonical asset
    /// root is [`PreviewError::NotFound`], including `..` escapes and symlinks
    /// pointing outside.
    pub async fn resolve(&self, filename: &str) -> Result<PathBuf> {
        if !filename.ends_with(HTML_EXTENSION) {
            return Err(PreviewError::NotFound);
        }

        let root = canonical(&self.web_dir).await?;
        let page = canonical(&self.web_dir.join(filename)).await?;
        if !page.starts_with(&root) {
            debug!("Rejected page outside asset root: {}", filename);
            return Err(PreviewError::NotFound);
        }

        let metadata = tokio::fs::metadata(&page)
            .await
            .map_err(|_| PreviewError::NotFound)?;
        if !metadata.is_file() {
            return Err(PreviewError::NotFound);
        }

        Ok(page)
    }

    /// Build the bridge script from freshly loaded data.
    pub async fn bridge_script(&self) -> Result<String> {
        let modules = if self.apply_overrides {
            let overrides = self.loader.load_overrides().await?;
            if overrides.is_empty() {
                debug!("No overrides configured, serving baseline metadata");
                Cow::Borrowed(self.catalog.modules())
            } else {
                Cow::Owned(merge_overrides(self.catalog.modules(), &overrides))
            }
        } else {
            Cow::Borrowed(self.catalog.modules())
        };

        let snapshot = BridgeSnapshot {
            tabs: self.catalog.tabs(),
            modules,
            friends: self.loader.load_friends().await?,
        };

        build_bridge_script(&snapshot, &self.build_info)
    }

    /// Read a page and splice the bridge script into it.
    pub async fn render(&self, filename: &str) -> Result<String> {
        let page = self.resolve(filename).await?;
        let html = tokio::fs::read_to_string(&page)
            .await
            .map_err(|source| PreviewError::Io {
                path: PathBuf::from(filename),
                source,
            })?;

        let script = self.bridge_script().await?;
        debug!("Serving page {} with injected bridge", filename);
        Ok(inject_inline_script(&html, &script))
    }
}

async fn canonical(path: &Path) -> Result<PathBuf> {
    tokio::fs::canonicalize(path)
        .await
        .map_err(|_| PreviewError::NotFound)
}
