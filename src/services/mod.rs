pub mod engine;
pub mod fallback;
pub mod popular;
pub mod profile;
pub mod ranker;
pub mod recommendations;
pub mod search;
pub mod stats;

pub use engine::{EngineSettings, RecommendationEngine};
pub use ranker::RankOptions;
pub use recommendations::RecommendationQuery;
