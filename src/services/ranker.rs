use rand::Rng;
use std::{cmp::Ordering, collections::HashSet};

use crate::{
    ml::{cosine_similarities, SparseVector},
    models::{ContentId, ContentItem, ContentType, RecommendationItem},
    services::fallback,
    store::Catalog,
};

/// Filters and size of one ranking call
#[derive(Debug, Clone)]
pub struct RankOptions<'a> {
    /// Ids that must not be returned (e.g. everything the user already rated)
    pub exclude: &'a HashSet<ContentId>,
    /// Restrict scoring and output to one content type
    pub content_type: Option<ContentType>,
    /// Keep only items whose category, type key or a genre matches
    pub category: Option<&'a str>,
    pub limit: usize,
}

/// Scores every item in scope against the profile, best first
///
/// Equal scores keep catalog order, so the result is deterministic for a
/// fixed profile and catalog.
pub fn score_catalog<'c>(
    profile: &SparseVector,
    catalog: &'c Catalog,
    content_type: Option<ContentType>,
) -> Vec<(&'c ContentItem, f64)> {
    let scoped: Vec<&ContentItem> = catalog.scoped(content_type).collect();
    let scores = cosine_similarities(profile, scoped.iter().map(|item| &item.feature_vector));

    let mut scored: Vec<(&ContentItem, f64)> = scoped.into_iter().zip(scores).collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored
}

/// Ranks catalog items for a profile
///
/// Without a profile the cold-start sampler answers instead. Otherwise items
/// are taken in similarity order, skipping excluded ids, ids already emitted
/// and items failing the filters, until `limit` items are collected.
pub fn rank<R: Rng + ?Sized>(
    profile: Option<&SparseVector>,
    catalog: &Catalog,
    options: &RankOptions<'_>,
    rng: &mut R,
) -> Vec<RecommendationItem> {
    let Some(profile) = profile else {
        return fallback::fallback(
            catalog,
            options.content_type,
            options.exclude,
            options.limit,
            rng,
        );
    };

    let mut emitted: HashSet<ContentId> = HashSet::new();
    let mut recommendations = Vec::with_capacity(options.limit);

    for (item, score) in score_catalog(profile, catalog, options.content_type) {
        if recommendations.len() >= options.limit {
            break;
        }
        if options.exclude.contains(&item.id) || emitted.contains(&item.id) {
            continue;
        }
        if let Some(category) = options.category {
            if !item.matches_category(category) {
                continue;
            }
        }

        emitted.insert(item.id);
        recommendations.push(RecommendationItem::from_item(item, score));
    }

    recommendations
}
