use crate::{
    config::Config,
    error::{AppError, AppResult},
    ml::TfidfVectorizer,
    models::{ContentRecord, Rating},
    services::{popular::DEFAULT_POPULAR_MIN_RATINGS, profile::DEFAULT_MIN_RATING_THRESHOLD},
    store::{Catalog, DataSource, RatingStore},
};

/// Tunables for the recommendation engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub min_rating_threshold: f64,
    pub max_features: usize,
    pub popular_min_ratings: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            min_rating_threshold: DEFAULT_MIN_RATING_THRESHOLD,
            max_features: 5000,
            popular_min_ratings: DEFAULT_POPULAR_MIN_RATINGS,
        }
    }
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            min_rating_threshold: config.min_rating_threshold,
            max_features: config.max_features,
            popular_min_ratings: config.popular_min_ratings,
        }
    }
}

/// Loaded catalog, ratings and vectorizer
///
/// Built once and then only read, so it can be shared across requests
/// behind an `Arc` without locking.
#[derive(Debug)]
pub struct RecommendationEngine {
    catalog: Catalog,
    ratings: RatingStore,
    vectorizer: TfidfVectorizer,
    settings: EngineSettings,
}

impl RecommendationEngine {
    /// Builds the engine from raw inputs
    ///
    /// Uses `vectorizer` when it is fitted, otherwise fits one on the catalog's
    /// feature text. Feature vectors are always recomputed from text here.
    pub fn build(
        records: Vec<ContentRecord>,
        ratings: Vec<Rating>,
        vectorizer: Option<TfidfVectorizer>,
        settings: EngineSettings,
    ) -> AppResult<Self> {
        if records.is_empty() {
            return Err(AppError::DataLoad("catalog is empty".to_string()));
        }

        let vectorizer = match vectorizer.filter(TfidfVectorizer::is_fitted) {
            Some(vectorizer) => vectorizer,
            None => {
                let texts: Vec<String> = records.iter().map(ContentRecord::feature_text).collect();
                let mut vectorizer = TfidfVectorizer::new()
                    .with_english_stop_words(true)
                    .with_max_features(settings.max_features);
                vectorizer.fit(&texts)?;
                tracing::info!(
                    dimension = vectorizer.dimension(),
                    "Fitted vectorizer on catalog"
                );
                vectorizer
            }
        };

        let catalog = Catalog::build(records, &vectorizer);
        let ratings = RatingStore::new(ratings);

        let orphaned = ratings
            .all()
            .iter()
            .filter(|rating| catalog.resolve(rating).is_none())
            .count();
        if orphaned > 0 {
            tracing::warn!(orphaned, "Ratings reference content missing from the catalog");
        }

        tracing::info!(
            items = catalog.len(),
            ratings = ratings.len(),
            users = ratings.user_count(),
            content_types = ?catalog.content_types(),
            "Recommendation engine ready"
        );

        Ok(Self {
            catalog,
            ratings,
            vectorizer,
            settings,
        })
    }

    /// Loads every input from `source` and builds the engine
    ///
    /// Vectorization runs on the blocking pool.
    pub async fn load(source: &dyn DataSource, settings: EngineSettings) -> AppResult<Self> {
        tracing::info!(source = source.name(), "Loading model artifacts");

        let records = source.load_catalog().await?;
        let ratings = source.load_ratings().await?;
        let vectorizer = source.load_vectorizer().await?;

        tokio::task::spawn_blocking(move || Self::build(records, ratings, vectorizer, settings))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ratings(&self) -> &RatingStore {
        &self.ratings
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
}
