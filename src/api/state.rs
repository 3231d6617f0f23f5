use std::sync::{Arc, Mutex};

use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::OnceCell;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    services::{EngineSettings, RecommendationEngine},
    store::DataSource,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    source: Arc<dyn DataSource>,
    engine: Arc<OnceCell<Arc<RecommendationEngine>>>,
    rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    /// Creates state whose engine is loaded from `source` on first use
    pub fn new(config: Config, source: Arc<dyn DataSource>) -> Self {
        let rng = match config.fallback_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config: Arc::new(config),
            source,
            engine: Arc::new(OnceCell::new()),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Returns the engine, loading it on the first call
    ///
    /// Concurrent callers wait on the single in-flight load. A failed load
    /// leaves the cell empty so a later call retries.
    pub async fn engine(&self) -> AppResult<Arc<RecommendationEngine>> {
        let settings = EngineSettings::from(self.config.as_ref());
        let source = Arc::clone(&self.source);

        self.engine
            .get_or_try_init(|| async move {
                RecommendationEngine::load(source.as_ref(), settings)
                    .await
                    .map(Arc::new)
            })
            .await
            .cloned()
            .map_err(|e| {
                tracing::error!(error = %e, source = self.source.name(), "Failed to load model");
                AppError::NotLoaded(e.to_string())
            })
    }

    /// The engine if it has already been loaded, without triggering a load
    pub fn loaded_engine(&self) -> Option<Arc<RecommendationEngine>> {
        self.engine.get().cloned()
    }

    /// A fresh generator for one request, split off the shared seed stream
    ///
    /// The shared lock is held only while the new generator is seeded.
    pub fn request_rng(&self) -> AppResult<StdRng> {
        let mut root = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        StdRng::from_rng(&mut *root).map_err(|e| AppError::Internal(e.to_string()))
    }
}
