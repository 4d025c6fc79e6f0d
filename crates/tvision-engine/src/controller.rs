//! Top-level view-state controller.
//!
//! Drives the Idle -> Searching -> ProductsFound screen machine around
//! trend discovery and owns the discovery error banner. Per-product
//! lifecycle is delegated to the [`JobTracker`].

use std::sync::{Arc, RwLock};

use tokio::task::JoinHandle;
use tracing::{info, warn};

use tvision_genai::{GenAiConfig, TrendsClient, VideoClient};
use tvision_models::{ProductId, TrendingProduct, ViewState};

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::keys::{KeyHost, KeyStore};
use crate::tracker::JobTracker;

/// Banner shown when a discovery call fails.
pub const DISCOVERY_FAILED_MESSAGE: &str =
    "Failed to fetch trending products. Please ensure your API key is correctly configured.";

/// Application controller consumed by the presentation layer.
pub struct App {
    trends: TrendsClient,
    tracker: Arc<JobTracker>,
    keys: Arc<KeyStore>,
    view: RwLock<ViewState>,
    products: RwLock<Vec<TrendingProduct>>,
    error: RwLock<Option<String>>,
}

impl App {
    /// Create a new controller in the idle view.
    pub fn new(trends: TrendsClient, tracker: Arc<JobTracker>, keys: Arc<KeyStore>) -> Self {
        Self {
            trends,
            tracker,
            keys,
            view: RwLock::new(ViewState::Idle),
            products: RwLock::new(Vec::new()),
            error: RwLock::new(None),
        }
    }

    /// Build the full engine stack from environment variables.
    ///
    /// The key-selection flow stays host-provided; everything else
    /// (API key, endpoints, poll cadence) comes from the environment.
    pub fn from_env(host: Arc<dyn KeyHost>) -> EngineResult<Self> {
        let genai = GenAiConfig::from_env()?;
        let trends = TrendsClient::new(genai.clone())?;
        let video = VideoClient::new(genai)?;

        let keys = Arc::new(KeyStore::new(host));
        let tracker = Arc::new(JobTracker::new(
            EngineConfig::from_env(),
            Arc::new(video),
            Arc::clone(&keys),
        ));

        Ok(Self::new(trends, tracker, keys))
    }

    pub fn view(&self) -> ViewState {
        *self.view.read().unwrap()
    }

    /// The current board, in discovery order.
    pub fn products(&self) -> Vec<TrendingProduct> {
        self.products.read().unwrap().clone()
    }

    /// Look up one product on the current board.
    pub fn product(&self, id: &ProductId) -> Option<TrendingProduct> {
        self.products
            .read()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    /// Current discovery error banner, if any.
    pub fn discovery_error(&self) -> Option<String> {
        self.error.read().unwrap().clone()
    }

    pub fn tracker(&self) -> &Arc<JobTracker> {
        &self.tracker
    }

    pub fn keys(&self) -> &Arc<KeyStore> {
        &self.keys
    }

    /// Resolve the credential flag against the host.
    pub async fn check_key(&self) -> bool {
        self.keys.check().await
    }

    /// Send the user through the host's key selection flow.
    pub async fn select_key(&self) {
        self.keys.select().await;
        *self.error.write().unwrap() = None;
    }

    /// Run a discovery pass.
    ///
    /// Allowed from `Idle` (first search) and `ProductsFound` (refresh); a
    /// call while another discovery is in flight is ignored. On success the
    /// board and every per-product status are replaced wholesale before the
    /// view flips; an empty result is still a success. On failure the view
    /// reverts to `Idle` with the banner set so the user can retry.
    pub async fn discover(&self) -> bool {
        {
            let mut view = self.view.write().unwrap();
            if *view == ViewState::Searching {
                return false;
            }
            *view = ViewState::Searching;
        }
        *self.error.write().unwrap() = None;

        match self.trends.find_trending().await {
            Ok(products) => {
                info!("Discovery resolved with {} products", products.len());
                self.tracker.reset(&products);
                *self.products.write().unwrap() = products;
                *self.view.write().unwrap() = ViewState::ProductsFound;
                true
            }
            Err(err) => {
                warn!("Trend discovery failed: {err}");
                *self.error.write().unwrap() = Some(DISCOVERY_FAILED_MESSAGE.to_string());
                *self.view.write().unwrap() = ViewState::Idle;
                false
            }
        }
    }

    /// Kick off ad generation for one product.
    pub fn generate(&self, product: TrendingProduct) -> JoinHandle<()> {
        self.tracker.spawn_generation(product)
    }

    /// Retry a failed product. Same path as [`App::generate`].
    pub fn retry(&self, product: TrendingProduct) -> JoinHandle<()> {
        self.tracker.spawn_generation(product)
    }
}
