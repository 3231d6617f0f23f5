use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Catalog CSV files, comma separated; missing files are skipped
    #[serde(default = "default_catalog_paths")]
    pub catalog_paths: Vec<String>,

    /// Ratings CSV file
    #[serde(default = "default_ratings_path")]
    pub ratings_path: String,

    /// Pre-fitted vectorizer JSON artifact
    #[serde(default)]
    pub vectorizer_path: Option<String>,

    /// Vocabulary cap used when fitting a vectorizer at load time
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Ratings at or above this value feed the user profile
    #[serde(default = "default_min_rating_threshold")]
    pub min_rating_threshold: f64,

    #[serde(default = "default_num_recommendations")]
    pub default_num_recommendations: usize,

    #[serde(default = "default_max_num_recommendations")]
    pub max_num_recommendations: usize,

    /// Minimum number of ratings before an item can rank as popular
    #[serde(default = "default_popular_min_ratings")]
    pub popular_min_ratings: usize,

    /// Fixed seed for the cold-start sampler; random when unset
    #[serde(default)]
    pub fallback_seed: Option<u64>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_catalog_paths() -> Vec<String> {
    ["movies", "tv_shows", "podcasts", "books"]
        .iter()
        .map(|name| format!("data/{}.csv", name))
        .collect()
}

fn default_ratings_path() -> String {
    "data/ratings.csv".to_string()
}

fn default_max_features() -> usize {
    5000
}

fn default_min_rating_threshold() -> f64 {
    4.0
}

fn default_num_recommendations() -> usize {
    5
}

fn default_max_num_recommendations() -> usize {
    100
}

fn default_popular_min_ratings() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            catalog_paths: default_catalog_paths(),
            ratings_path: default_ratings_path(),
            vectorizer_path: None,
            max_features: default_max_features(),
            min_rating_threshold: default_min_rating_threshold(),
            default_num_recommendations: default_num_recommendations(),
            max_num_recommendations: default_max_num_recommendations(),
            popular_min_ratings: default_popular_min_ratings(),
            fallback_seed: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
