use rand::{seq::SliceRandom, Rng};
use std::collections::HashSet;

use crate::{
    models::{ContentId, ContentItem, ContentType, RecommendationItem},
    store::Catalog,
};

/// Cold-start recommendations for users without a usable profile
///
/// Samples `min(limit, eligible)` distinct items uniformly at random from the
/// catalog, or from one content type when given. Items in `exclude` are never
/// eligible. Every score is 0.0.
pub fn fallback<R: Rng + ?Sized>(
    catalog: &Catalog,
    content_type: Option<ContentType>,
    exclude: &HashSet<ContentId>,
    limit: usize,
    rng: &mut R,
) -> Vec<RecommendationItem> {
    let eligible: Vec<&ContentItem> = catalog
        .scoped(content_type)
        .filter(|item| !exclude.contains(&item.id))
        .collect();
    let amount = limit.min(eligible.len());

    tracing::info!(
        eligible = eligible.len(),
        excluded = exclude.len(),
        amount,
        content_type = ?content_type,
        "No profile available, sampling random content"
    );

    eligible
        .choose_multiple(rng, amount)
        .map(|item| RecommendationItem::from_item(item, 0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use rand::{rngs::StdRng, SeedableRng};

    fn sample(
        catalog: &Catalog,
        content_type: Option<ContentType>,
        limit: usize,
        rng: &mut StdRng,
    ) -> Vec<RecommendationItem> {
        fallback(catalog, content_type, &HashSet::new(), limit, rng)
    }

    #[test]
    fn test_sample_size_is_capped_by_catalog() {
        let catalog = fixtures::mixed_catalog();
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(sample(&catalog, None, 3, &mut rng).len(), 3);
        assert_eq!(sample(&catalog, None, 100, &mut rng).len(), catalog.len());
        assert_eq!(
            sample(&catalog, Some(ContentType::TvShow), 100, &mut rng).len(),
            2
        );
    }

    #[test]
    fn test_sample_has_no_duplicates_and_zero_scores() {
        let catalog = fixtures::mixed_catalog();
        let mut rng = StdRng::seed_from_u64(11);

        let items = sample(&catalog, None, catalog.len(), &mut rng);
        let unique: HashSet<&str> = items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(unique.len(), items.len());
        assert!(items.iter().all(|r| r.similarity_score == 0.0));
    }

    #[test]
    fn test_excluded_items_are_never_sampled() {
        let catalog = fixtures::mixed_catalog();
        let exclude = HashSet::from([ContentId(1), ContentId(2), ContentId(10001)]);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let items = fallback(&catalog, None, &exclude, 100, &mut rng);
            assert_eq!(items.len(), catalog.len() - exclude.len());
            assert!(items.iter().all(|r| r.id != "1" && r.id != "2" && r.id != "10001"));
        }

        let mut rng = StdRng::seed_from_u64(0);
        let tv = fallback(&catalog, Some(ContentType::TvShow), &exclude, 5, &mut rng);
        assert_eq!(tv.len(), 1);
        assert_eq!(tv[0].id, "10002");
    }

    #[test]
    fn test_content_type_scope() {
        let catalog = fixtures::mixed_catalog();
        let mut rng = StdRng::seed_from_u64(5);

        let books = sample(&catalog, Some(ContentType::Book), 5, &mut rng);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].content_type, ContentType::Book);
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let catalog = fixtures::mixed_catalog();
        let first = sample(&catalog, None, 4, &mut StdRng::seed_from_u64(42));
        let second = sample(&catalog, None, 4, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_scope_returns_nothing() {
        let catalog = fixtures::abc_catalog();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(sample(&catalog, Some(ContentType::Podcast), 5, &mut rng).is_empty());
        assert!(sample(&catalog, None, 0, &mut rng).is_empty());
    }
}
