use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::ml::{SparseVector, TfidfVectorizer};

/// Stable identifier of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub i64);

impl Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ContentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Kind of content in the catalog
///
/// Wire names are the plural keys (`movies`, `tv_shows`, ...); singular forms
/// are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "movies", alias = "movie")]
    Movie,
    #[serde(rename = "tv_shows", alias = "tv_show")]
    TvShow,
    #[serde(rename = "podcasts", alias = "podcast")]
    Podcast,
    #[serde(rename = "books", alias = "book")]
    Book,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Movie,
        ContentType::TvShow,
        ContentType::Podcast,
        ContentType::Book,
    ];

    /// Wire key, e.g. `tv_shows`
    pub fn key(&self) -> &'static str {
        match self {
            ContentType::Movie => "movies",
            ContentType::TvShow => "tv_shows",
            ContentType::Podcast => "podcasts",
            ContentType::Book => "books",
        }
    }

    /// Human-readable label, e.g. `TV Shows`
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Movie => "Movies",
            ContentType::TvShow => "TV Shows",
            ContentType::Podcast => "Podcasts",
            ContentType::Book => "Books",
        }
    }

    /// Guesses the content type of an untyped record from its genre tags
    pub fn infer_from_genres(genres: &[String]) -> Self {
        let has_any = |needles: &[&str]| {
            genres
                .iter()
                .any(|g| needles.iter().any(|n| g.to_lowercase().contains(n)))
        };

        if has_any(&["documentary", "reality-tv"]) {
            ContentType::TvShow
        } else if has_any(&["news", "talk-show"]) {
            ContentType::Podcast
        } else if has_any(&["biography", "history"]) {
            ContentType::Book
        } else {
            ContentType::Movie
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid content type '{0}'. Supported types: movies, tv_shows, podcasts, books")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movies" | "movie" => Ok(ContentType::Movie),
            "tv_shows" | "tv_show" => Ok(ContentType::TvShow),
            "podcasts" | "podcast" => Ok(ContentType::Podcast),
            "books" | "book" => Ok(ContentType::Book),
            other => Err(UnknownContentType(other.to_string())),
        }
    }
}

/// Raw catalog row as read from a data file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(alias = "movieId")]
    pub id: ContentId,
    pub title: String,
    /// `|`-separated genre tags
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "type")]
    pub content_type: Option<ContentType>,
    #[serde(default)]
    pub combined_features: Option<String>,
}

impl ContentRecord {
    pub fn new(id: i64, title: &str, genres: &str) -> Self {
        Self {
            id: ContentId(id),
            title: title.to_string(),
            genres: genres.to_string(),
            description: None,
            content_type: None,
            combined_features: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn genre_tags(&self) -> Vec<String> {
        self.genres
            .split('|')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Text fed to the vectorizer
    ///
    /// Uses the precomputed `combined_features` column when present, otherwise
    /// title, genres and description joined by spaces.
    pub fn feature_text(&self) -> String {
        if let Some(features) = self.combined_features.as_deref().filter(|f| !f.trim().is_empty()) {
            return features.to_string();
        }

        let mut text = format!("{} {}", self.title, self.genres);
        if let Some(description) = self.description.as_deref() {
            text.push(' ');
            text.push_str(description);
        }
        text
    }

    /// Builds a catalog item, deriving its feature vector from the feature text
    pub fn into_item(self, vectorizer: &TfidfVectorizer) -> ContentItem {
        let genres = self.genre_tags();
        let feature_text = self.feature_text();
        let feature_vector = vectorizer.transform(&feature_text);
        let content_type = self
            .content_type
            .unwrap_or_else(|| ContentType::infer_from_genres(&genres));

        ContentItem {
            id: self.id,
            title: self.title,
            genres,
            description: self.description.filter(|d| !d.trim().is_empty()),
            feature_text,
            content_type,
            feature_vector,
        }
    }
}

/// A catalog entry with its derived feature vector
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub id: ContentId,
    pub title: String,
    pub genres: Vec<String>,
    pub description: Option<String>,
    pub feature_text: String,
    pub content_type: ContentType,
    pub feature_vector: SparseVector,
}

impl ContentItem {
    /// Genres formatted for display, e.g. `Action, Drama`
    pub fn genre_display(&self) -> String {
        self.genres.join(", ")
    }

    /// Description, or a genre summary when the record had none
    pub fn description_or_genres(&self) -> String {
        match &self.description {
            Some(description) => description.clone(),
            None => format!("Genres: {}", self.genre_display()),
        }
    }

    pub fn category(&self) -> &'static str {
        self.content_type.label()
    }

    /// Case-insensitive match against the category label, type key or any genre
    pub fn matches_category(&self, category: &str) -> bool {
        let wanted = category.trim();
        self.category().eq_ignore_ascii_case(wanted)
            || self.content_type.key().eq_ignore_ascii_case(wanted)
            || self.genres.iter().any(|g| g.eq_ignore_ascii_case(wanted))
    }
}
