use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{ContentId, ContentType};

pub type UserId = i64;

/// Rating at or above which an item counts as liked
pub const HIGH_RATING_THRESHOLD: f64 = 4.0;

/// One user's rating of one catalog item
///
/// Column names follow the ratings file (`userId`, `contentId`, ...). Files
/// from the movie-only dataset use `movieId` and carry no content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "contentId", alias = "movieId")]
    pub content_id: ContentId,
    #[serde(rename = "contentType", default)]
    pub content_type: Option<ContentType>,
    pub rating: f64,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Rating {
    pub fn new(user_id: UserId, content_id: i64, rating: f64) -> Self {
        Self {
            user_id,
            content_id: ContentId(content_id),
            content_type: None,
            rating,
            timestamp: None,
        }
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn is_high(&self) -> bool {
        self.rating >= HIGH_RATING_THRESHOLD
    }
}

/// Parses Unix seconds, RFC 3339 or `YYYY-MM-DD HH:MM:SS` (assumed UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(seconds) = raw.parse::<i64>() {
        return DateTime::<Utc>::from_timestamp(seconds, 0);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}
