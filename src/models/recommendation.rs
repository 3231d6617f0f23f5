use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContentItem, ContentType};

/// A recommended item as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub id: String,
    pub title: String,
    pub category: String,
    pub content_type: ContentType,
    pub genre: String,
    pub description: String,
    /// Cosine similarity to the user's profile; 0.0 on the cold-start path
    pub similarity_score: f64,
}

impl RecommendationItem {
    pub fn from_item(item: &ContentItem, similarity_score: f64) -> Self {
        Self {
            id: item.id.to_string(),
            title: item.title.clone(),
            category: item.category().to_string(),
            content_type: item.content_type,
            genre: item.genre_display(),
            description: item.description_or_genres(),
            similarity_score,
        }
    }
}

/// Search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSummary {
    pub id: String,
    pub title: String,
    pub content_type: ContentType,
    pub genre: String,
    pub description: String,
}

impl From<&ContentItem> for ContentSummary {
    fn from(item: &ContentItem) -> Self {
        Self {
            id: item.id.to_string(),
            title: item.title.clone(),
            content_type: item.content_type,
            genre: item.genre_display(),
            description: item.description_or_genres(),
        }
    }
}

/// Item ranked by mean rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularItem {
    pub id: String,
    pub title: String,
    pub content_type: ContentType,
    pub genre: String,
    pub avg_rating: f64,
    pub rating_count: usize,
}

/// Rating counts per content type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeBreakdown {
    pub movies: usize,
    pub tv_shows: usize,
    pub podcasts: usize,
    pub books: usize,
}

impl ContentTypeBreakdown {
    pub fn increment(&mut self, content_type: ContentType) {
        *self.slot_mut(content_type) += 1;
    }

    pub fn total(&self) -> usize {
        self.movies + self.tv_shows + self.podcasts + self.books
    }

    fn slot_mut(&mut self, content_type: ContentType) -> &mut usize {
        match content_type {
            ContentType::Movie => &mut self.movies,
            ContentType::TvShow => &mut self.tv_shows,
            ContentType::Podcast => &mut self.podcasts,
            ContentType::Book => &mut self.books,
        }
    }
}

/// Descriptive statistics over one user's ratings
///
/// Always fully populated: a user without ratings gets the zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_ratings: usize,
    pub average_rating: f64,
    pub high_ratings: usize,
    pub favorite_genres: Vec<String>,
    pub content_type_breakdown: ContentTypeBreakdown,
    pub last_rated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_serializes_every_type() {
        let mut breakdown = ContentTypeBreakdown::default();
        breakdown.increment(ContentType::Podcast);
        breakdown.increment(ContentType::Podcast);

        let json = serde_json::to_value(breakdown).unwrap();
        assert_eq!(json["movies"], 0);
        assert_eq!(json["tv_shows"], 0);
        assert_eq!(json["podcasts"], 2);
        assert_eq!(json["books"], 0);
        assert_eq!(breakdown.total(), 2);
    }

    #[test]
    fn test_default_stats_are_zero() {
        let stats = UserStats::default();
        assert_eq!(stats.total_ratings, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert!(stats.favorite_genres.is_empty());
        assert_eq!(stats.content_type_breakdown.total(), 0);
        assert!(stats.last_rated_at.is_none());
    }
}
