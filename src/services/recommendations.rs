use rand::Rng;

use crate::{
    models::{ContentType, RecommendationItem, UserId},
    services::{
        profile::build_profile,
        ranker::{rank, RankOptions},
        RecommendationEngine,
    },
};

/// A validated recommendation request
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationQuery {
    pub user_id: UserId,
    pub content_type: Option<ContentType>,
    pub category_filter: Option<String>,
    pub limit: usize,
}

impl RecommendationQuery {
    pub fn new(user_id: UserId, limit: usize) -> Self {
        Self {
            user_id,
            content_type: None,
            category_filter: None,
            limit,
        }
    }
}

/// Generates personalized recommendations
///
/// Builds the user's profile from their highly rated items and ranks the
/// catalog against it, never returning something the user has already
/// rated. Users without a profile get a random cold-start sample drawn from
/// the items they have not rated.
pub fn get_recommendations<R: Rng + ?Sized>(
    engine: &RecommendationEngine,
    query: &RecommendationQuery,
    rng: &mut R,
) -> Vec<RecommendationItem> {
    let catalog = engine.catalog();
    let ratings = engine.ratings();

    let profile = build_profile(
        catalog,
        ratings,
        query.user_id,
        engine.settings().min_rating_threshold,
        query.content_type,
    );

    let already_rated = ratings.rated_ids(query.user_id);
    let options = RankOptions {
        exclude: &already_rated,
        content_type: query.content_type,
        category: query.category_filter.as_deref(),
        limit: query.limit,
    };

    let recommendations = rank(profile.as_ref(), catalog, &options, rng);

    tracing::info!(
        user_id = query.user_id,
        content_type = ?query.content_type,
        personalized = profile.is_some(),
        count = recommendations.len(),
        "Generated recommendations"
    );

    recommendations
}
