use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum_test::TestServer;

use recommendation_api::{
    api::{create_router, AppState},
    config::Config,
    error::{AppError, AppResult},
    ml::TfidfVectorizer,
    models::{ContentRecord, ContentType, Rating},
    store::DataSource,
};

/// Serves fixed records from memory and counts catalog loads
#[derive(Default)]
pub struct MemorySource {
    pub records: Vec<ContentRecord>,
    pub ratings: Vec<Rating>,
    pub fail: bool,
    pub loads: AtomicUsize,
}

#[async_trait::async_trait]
impl DataSource for MemorySource {
    async fn load_catalog(&self) -> AppResult<Vec<ContentRecord>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::DataLoad("catalog unavailable".to_string()));
        }
        Ok(self.records.clone())
    }

    async fn load_ratings(&self) -> AppResult<Vec<Rating>> {
        Ok(self.ratings.clone())
    }

    async fn load_vectorizer(&self) -> AppResult<Option<TfidfVectorizer>> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

pub fn catalog() -> Vec<ContentRecord> {
    vec![
        ContentRecord::new(1, "Heat", "Action|Crime|Thriller")
            .with_description("A group of professional bank robbers"),
        ContentRecord::new(2, "Toy Story", "Adventure|Animation|Children"),
        ContentRecord::new(3, "Ronin", "Action|Crime|Thriller"),
        ContentRecord::new(4, "Up", "Adventure|Animation"),
        ContentRecord::new(10001, "Breaking Bad", "Crime|Drama|Thriller")
            .with_content_type(ContentType::TvShow),
        ContentRecord::new(10002, "Friends", "Comedy|Romance")
            .with_content_type(ContentType::TvShow),
        ContentRecord::new(20001, "Serial", "Crime|Documentary|Mystery")
            .with_content_type(ContentType::Podcast),
        ContentRecord::new(30001, "The Hobbit", "Fantasy|Adventure|Fiction")
            .with_content_type(ContentType::Book),
    ]
}

/// User 1 likes crime thrillers; items 1 and 10001 have five ratings each
pub fn ratings() -> Vec<Rating> {
    let mut ratings = vec![
        Rating::new(1, 1, 5.0),
        Rating::new(1, 2, 2.0),
        Rating::new(1, 10001, 4.0),
    ];
    for user in 2..=6 {
        ratings.push(Rating::new(user, 1, 4.0));
        ratings.push(Rating::new(user, 10001, 5.0));
    }
    ratings
}

pub fn test_config() -> Config {
    Config {
        fallback_seed: Some(42),
        ..Config::default()
    }
}

pub fn server_with(source: Arc<MemorySource>) -> TestServer {
    let state = AppState::new(test_config(), source);
    TestServer::new(create_router(state)).unwrap()
}

pub fn create_test_server() -> TestServer {
    server_with(Arc::new(MemorySource {
        records: catalog(),
        ratings: ratings(),
        ..MemorySource::default()
    }))
}
