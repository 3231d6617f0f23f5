//! Data source abstraction
//!
//! The engine is built from three inputs: raw catalog records, the rating
//! history and an optional pre-fitted vectorizer. Production reads them from
//! CSV/JSON files; tests substitute in-memory fixtures or mocks.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    ml::TfidfVectorizer,
    models::{ContentRecord, ContentType, Rating},
};

/// Supplies the raw inputs the recommendation engine is built from
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Catalog records in catalog order
    async fn load_catalog(&self) -> AppResult<Vec<ContentRecord>>;

    /// Full rating history
    async fn load_ratings(&self) -> AppResult<Vec<Rating>>;

    /// Pre-fitted vectorizer, if one was supplied
    ///
    /// `None` makes the engine fit a vectorizer on the catalog's feature text.
    async fn load_vectorizer(&self) -> AppResult<Option<TfidfVectorizer>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Reads catalog and ratings from CSV files and the vectorizer from JSON
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    catalog_paths: Vec<PathBuf>,
    ratings_path: PathBuf,
    vectorizer_path: Option<PathBuf>,
}

impl CsvDataSource {
    pub fn new(
        catalog_paths: Vec<PathBuf>,
        ratings_path: PathBuf,
        vectorizer_path: Option<PathBuf>,
    ) -> Self {
        Self {
            catalog_paths,
            ratings_path,
            vectorizer_path,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.catalog_paths.iter().map(PathBuf::from).collect(),
            PathBuf::from(&config.ratings_path),
            config.vectorizer_path.as_ref().map(PathBuf::from),
        )
    }

    /// Content type implied by a file name such as `tv_shows.csv`
    fn content_type_for(path: &Path) -> Option<ContentType> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse().ok())
    }
}

async fn file_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Deserializes every row of a CSV document with headers
pub fn parse_csv<T: DeserializeOwned>(content: &str) -> AppResult<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(AppError::from)
}

#[async_trait::async_trait]
impl DataSource for CsvDataSource {
    async fn load_catalog(&self) -> AppResult<Vec<ContentRecord>> {
        let mut records = Vec::new();

        for path in &self.catalog_paths {
            if !file_exists(path).await {
                tracing::warn!(path = %path.display(), "Catalog file not found, skipping");
                continue;
            }

            let content = tokio::fs::read_to_string(path).await?;
            let mut file_records: Vec<ContentRecord> = parse_csv(&content).map_err(|e| {
                AppError::DataLoad(format!("{}: {}", path.display(), e))
            })?;

            if let Some(content_type) = Self::content_type_for(path) {
                for record in &mut file_records {
                    record.content_type.get_or_insert(content_type);
                }
            }

            tracing::info!(
                path = %path.display(),
                items = file_records.len(),
                "Loaded catalog file"
            );
            records.extend(file_records);
        }

        Ok(records)
    }

    async fn load_ratings(&self) -> AppResult<Vec<Rating>> {
        if !file_exists(&self.ratings_path).await {
            tracing::warn!(
                path = %self.ratings_path.display(),
                "Ratings file not found, every user starts cold"
            );
            return Ok(Vec::new());
        }

        let content = tokio::fs::read_to_string(&self.ratings_path).await?;
        let ratings: Vec<Rating> = parse_csv(&content).map_err(|e| {
            AppError::DataLoad(format!("{}: {}", self.ratings_path.display(), e))
        })?;

        tracing::info!(ratings = ratings.len(), "Loaded ratings");
        Ok(ratings)
    }

    async fn load_vectorizer(&self) -> AppResult<Option<TfidfVectorizer>> {
        let Some(path) = &self.vectorizer_path else {
            return Ok(None);
        };

        if !file_exists(path).await {
            tracing::warn!(path = %path.display(), "Vectorizer artifact not found, will fit a new one");
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(path).await?;
        let vectorizer: TfidfVectorizer = serde_json::from_str(&content)?;
        vectorizer
            .validate()
            .map_err(|e| AppError::DataLoad(format!("{}: {}", path.display(), e)))?;
        tracing::info!(
            path = %path.display(),
            dimension = vectorizer.dimension(),
            "Loaded vectorizer artifact"
        );
        Ok(Some(vectorizer))
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}
