//! Preview server implementation

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::bridge::DEFAULT_BUILD_INFO;
use crate::catalog::Catalog;
use crate::handlers;
use crate::overrides::OverrideLoader;
use crate::responder::PageResponder;

/// Asset subdirectories served verbatim under the same URL prefix.
pub const STATIC_MOUNTS: [&str; 3] = ["css", "js", "images"];

/// Configuration for the preview server
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Address to bind
    pub host: IpAddr,
    /// Port for the preview server
    pub port: u16,
    /// Root of the bundled web UI
    pub web_dir: PathBuf,
    /// Persisted override document (`modelFieldsMap`)
    pub config_file: PathBuf,
    /// Friend document offered to list fields
    pub friend_file: PathBuf,
    /// Merge `config_file` into module metadata before it reaches the bridge
    pub apply_overrides: bool,
    /// Value reported by `HOOK.getBuildInfo()`
    pub build_info: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            web_dir: PathBuf::from("web"),
            config_file: PathBuf::from("config.json"),
            friend_file: PathBuf::from("friend.json"),
            apply_overrides: false,
            build_info: DEFAULT_BUILD_INFO.to_string(),
        }
    }
}

impl PreviewConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// URL of the landing page once the server is up.
    pub fn index_url(&self) -> String {
        format!("http://{}/{}", self.addr(), handlers::page::INDEX_PAGE)
    }
}

/// Shared application state
pub struct AppState {
    pub responder: PageResponder,
}

/// Web UI preview server
pub struct PreviewServer;

impl PreviewServer {
    /// Build the router without binding a socket.
    pub fn router(config: PreviewConfig, catalog: Arc<Catalog>) -> Router {
        let loader = OverrideLoader::new(&config.config_file, &config.friend_file);
        let responder = PageResponder::new(&config.web_dir, catalog, loader, &config.build_info)
            .with_overrides(config.apply_overrides);

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let mut app = Router::new()
            .route("/", get(handlers::page::index))
            .route("/{filename}", get(handlers::page::serve));

        for mount in STATIC_MOUNTS {
            app = app.nest_service(
                &format!("/{mount}"),
                ServeDir::new(config.web_dir.join(mount)),
            );
        }

        let state = Arc::new(AppState { responder });
        app.layer(cors).with_state(state)
    }

    /// Start the preview server
    pub async fn start(config: PreviewConfig) -> Result<()> {
        let catalog = Arc::new(Catalog::embedded().context("Failed to load metadata catalog")?);
        info!(
            "Loaded metadata catalog: {} tabs, {} modules",
            catalog.tabs().len(),
            catalog.modules().len()
        );

        let addr = config.addr();
        if !config.web_dir.is_dir() {
            tracing::warn!("Web directory does not exist: {}", config.web_dir.display());
        }
        info!("Serving web UI from {}", config.web_dir.display());
        info!(
            "Override file: {} (applied: {})",
            config.config_file.display(),
            config.apply_overrides
        );
        info!("Friend file: {}", config.friend_file.display());

        let app = Self::router(config.clone(), catalog);

        info!("Preview server starting on {}", config.index_url());

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
