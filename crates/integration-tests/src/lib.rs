//! Integration tests for LanguageShop.
//!
//! Each test starts a real storefront on an ephemeral port with its own
//! temporary data directory and talks to it over HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p language-shop-integration-tests
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use language_shop_storefront::config::StorefrontConfig;
use language_shop_storefront::state::AppState;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use url::Url;

/// A storefront running in the test process.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub state: AppState,
    data_dir: TempDir,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a storefront over the built-in catalog, with the catalog
    /// loaded and no checkout delay.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start a storefront after adjusting the default test configuration.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    #[allow(clippy::expect_used)]
    pub async fn start_with(configure: impl FnOnce(&mut StorefrontConfig)) -> Self {
        let data_dir = tempfile::tempdir().expect("create data dir");
        Self::start_in(data_dir, configure).await
    }

    #[allow(clippy::expect_used)]
    async fn start_in(data_dir: TempDir, configure: impl FnOnce(&mut StorefrontConfig)) -> Self {
        let mut config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            data_dir: data_dir.path().to_path_buf(),
            checkout_delay: Duration::ZERO,
            ..StorefrontConfig::default()
        };
        configure(&mut config);

        let listener = tokio::net::TcpListener::bind(config.socket_addr())
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");

        let state = language_shop_storefront::build_state(config).expect("build state");
        state.reload_catalog().await;

        let app = language_shop_storefront::app(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            state,
            data_dir,
            handle,
        }
    }

    /// Stop this server and start a new one over the same data directory.
    ///
    /// # Panics
    ///
    /// Panics if the new server cannot be started.
    pub async fn restart(self) -> Self {
        self.handle.abort();
        Self::start_in(self.data_dir, |_| {}).await
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Base URL of this server's mock catalog API.
    ///
    /// # Panics
    ///
    /// Panics if the address does not form a valid URL.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn api_url(&self) -> Url {
        Url::parse(&self.url("/api")).expect("valid API URL")
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.path().to_path_buf()
    }
}
