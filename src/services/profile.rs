use crate::{
    ml::SparseVector,
    models::{ContentItem, ContentType, Rating, UserId},
    store::{Catalog, RatingStore},
};

/// Default rating a user must give an item for it to shape their profile
pub const DEFAULT_MIN_RATING_THRESHOLD: f64 = 4.0;

/// Builds a user's preference vector from the items they rated highly
///
/// The profile is the rating-weighted average of the feature vectors of every
/// item the user rated at or above `min_rating_threshold` (and of
/// `content_type`, when given). Weights are the ratings normalised to sum to
/// one, or uniform when the ratings sum to zero or less. Repeated ratings of
/// the same item each contribute.
///
/// Returns `None` when the user has no qualifying rating or none of them
/// resolve to a catalog item. Unresolvable ratings are skipped.
pub fn build_profile(
    catalog: &Catalog,
    ratings: &RatingStore,
    user_id: UserId,
    min_rating_threshold: f64,
    content_type: Option<ContentType>,
) -> Option<SparseVector> {
    let selected: Vec<&Rating> = ratings
        .for_user(user_id)
        .filter(|r| r.rating >= min_rating_threshold)
        .filter(|r| match (content_type, r.content_type) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        })
        .collect();

    if selected.is_empty() {
        tracing::info!(
            user_id,
            content_type = ?content_type,
            threshold = min_rating_threshold,
            "User has no ratings at or above threshold"
        );
        return None;
    }

    let mut liked: Vec<(&ContentItem, f64)> = Vec::with_capacity(selected.len());
    let mut orphaned = 0usize;

    for rating in selected {
        match catalog.resolve(rating) {
            Some(item) if content_type.map_or(true, |ct| ct == item.content_type) => {
                liked.push((item, rating.rating));
            }
            Some(_) => {}
            None => orphaned += 1,
        }
    }

    if orphaned > 0 {
        tracing::warn!(user_id, orphaned, "Skipped ratings referencing unknown content");
    }

    if liked.is_empty() {
        tracing::warn!(user_id, "No catalog items found for the user's highly rated content");
        return None;
    }

    let total: f64 = liked.iter().map(|(_, rating)| rating).sum();
    let count = liked.len() as f64;
    let weight_of = |rating: f64| {
        if total > 0.0 {
            rating / total
        } else {
            1.0 / count
        }
    };

    let profile = SparseVector::weighted_sum(
        catalog.dimension(),
        liked
            .iter()
            .map(|(item, rating)| (&item.feature_vector, weight_of(*rating))),
    );

    tracing::debug!(
        user_id,
        items = liked.len(),
        nnz = profile.nnz(),
        "Built user profile"
    );

    Some(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentId;
    use crate::services::fixtures;

    const EPS: f64 = 1e-9;

    fn vector_of(catalog: &Catalog, id: i64) -> &SparseVector {
        &catalog.get(ContentId(id)).unwrap().feature_vector
    }

    fn assert_close(a: &SparseVector, b: &SparseVector) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.to_dense().iter().zip(b.to_dense()) {
            assert!((x - y).abs() < EPS, "{x} != {y}");
        }
    }

    #[test]
    fn test_single_rating_profile_equals_item_vector() {
        let catalog = fixtures::abc_catalog();
        let ratings = fixtures::ratings(vec![Rating::new(1, 1, 5.0)]);

        let profile = build_profile(&catalog, &ratings, 1, DEFAULT_MIN_RATING_THRESHOLD, None)
            .unwrap();
        assert_close(&profile, vector_of(&catalog, 1));
    }

    #[test]
    fn test_weights_are_normalised_ratings() {
        let catalog = fixtures::abc_catalog();
        let ratings = fixtures::ratings(vec![Rating::new(1, 1, 5.0), Rating::new(1, 3, 4.0)]);

        let profile = build_profile(&catalog, &ratings, 1, DEFAULT_MIN_RATING_THRESHOLD, None)
            .unwrap();
        let expected = SparseVector::weighted_sum(
            catalog.dimension(),
            vec![
                (vector_of(&catalog, 1), 5.0 / 9.0),
                (vector_of(&catalog, 3), 4.0 / 9.0),
            ],
        );
        assert_close(&profile, &expected);
    }

    #[test]
    fn test_no_qualifying_ratings_is_none() {
        let catalog = fixtures::abc_catalog();
        let ratings = fixtures::ratings(vec![Rating::new(1, 1, 3.5), Rating::new(1, 2, 2.0)]);

        assert!(build_profile(&catalog, &ratings, 1, DEFAULT_MIN_RATING_THRESHOLD, None).is_none());
        assert!(build_profile(&catalog, &ratings, 2, DEFAULT_MIN_RATING_THRESHOLD, None).is_none());
    }

    #[test]
    fn test_orphaned_ratings_are_skipped() {
        let catalog = fixtures::abc_catalog();

        let only_orphans = fixtures::ratings(vec![Rating::new(1, 999, 5.0)]);
        assert!(
            build_profile(&catalog, &only_orphans, 1, DEFAULT_MIN_RATING_THRESHOLD, None).is_none()
        );

        let mixed = fixtures::ratings(vec![Rating::new(1, 999, 5.0), Rating::new(1, 2, 4.0)]);
        let profile =
            build_profile(&catalog, &mixed, 1, DEFAULT_MIN_RATING_THRESHOLD, None).unwrap();
        assert_close(&profile, vector_of(&catalog, 2));
    }

    #[test]
    fn test_zero_sum_falls_back_to_uniform_weights() {
        let catalog = fixtures::abc_catalog();
        let ratings = fixtures::ratings(vec![Rating::new(1, 1, 0.0), Rating::new(1, 3, 0.0)]);

        let profile = build_profile(&catalog, &ratings, 1, 0.0, None).unwrap();
        let expected = SparseVector::weighted_sum(
            catalog.dimension(),
            vec![(vector_of(&catalog, 1), 0.5), (vector_of(&catalog, 3), 0.5)],
        );
        assert_close(&profile, &expected);
    }

    #[test]
    fn test_duplicate_ratings_both_count() {
        let catalog = fixtures::abc_catalog();
        let ratings = fixtures::ratings(vec![
            Rating::new(1, 1, 4.0),
            Rating::new(1, 1, 4.0),
            Rating::new(1, 3, 4.0),
        ]);

        let profile = build_profile(&catalog, &ratings, 1, DEFAULT_MIN_RATING_THRESHOLD, None)
            .unwrap();
        let expected = SparseVector::weighted_sum(
            catalog.dimension(),
            vec![
                (vector_of(&catalog, 1), 2.0 / 3.0),
                (vector_of(&catalog, 3), 1.0 / 3.0),
            ],
        );
        assert_close(&profile, &expected);
    }

    #[test]
    fn test_content_type_scopes_profile() {
        let catalog = fixtures::mixed_catalog();
        let ratings = fixtures::ratings(vec![
            Rating::new(1, 1, 5.0),
            Rating::new(1, 20001, 5.0).with_content_type(ContentType::Podcast),
        ]);

        let podcasts =
            build_profile(&catalog, &ratings, 1, 4.0, Some(ContentType::Podcast)).unwrap();
        assert_close(&podcasts, vector_of(&catalog, 20001));

        let movies = build_profile(&catalog, &ratings, 1, 4.0, Some(ContentType::Movie)).unwrap();
        assert_close(&movies, vector_of(&catalog, 1));

        assert!(build_profile(&catalog, &ratings, 1, 4.0, Some(ContentType::Book)).is_none());
    }

    #[test]
    fn test_mismatched_content_type_is_orphaned() {
        let catalog = fixtures::mixed_catalog();
        let ratings = fixtures::ratings(vec![
            Rating::new(1, 1, 5.0).with_content_type(ContentType::Book),
        ]);
        assert!(build_profile(&catalog, &ratings, 1, 4.0, None).is_none());
    }
}
