pub mod content;
pub mod rating;
pub mod recommendation;

pub use content::{ContentId, ContentItem, ContentRecord, ContentType, UnknownContentType};
pub use rating::{parse_timestamp, Rating, UserId, HIGH_RATING_THRESHOLD};
pub use recommendation::{
    ContentSummary, ContentTypeBreakdown, PopularItem, RecommendationItem, UserStats,
};
