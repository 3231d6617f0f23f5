use std::{cmp::Ordering, collections::HashMap};

use crate::{
    models::{ContentId, ContentType, PopularItem},
    store::{Catalog, RatingStore},
};

pub const DEFAULT_POPULAR_MIN_RATINGS: usize = 5;

/// Items with the highest mean rating
///
/// Only items with at least `min_ratings` resolvable ratings qualify. Equal
/// means rank the more-rated item first, then catalog order.
pub fn popular_content(
    catalog: &Catalog,
    ratings: &RatingStore,
    content_type: Option<ContentType>,
    limit: usize,
    min_ratings: usize,
) -> Vec<PopularItem> {
    let mut totals: HashMap<ContentId, (f64, usize)> = HashMap::new();
    for rating in ratings.all() {
        if let Some(item) = catalog.resolve(rating) {
            let entry = totals.entry(item.id).or_insert((0.0, 0));
            entry.0 += rating.rating;
            entry.1 += 1;
        }
    }

    let mut popular: Vec<PopularItem> = catalog
        .scoped(content_type)
        .filter_map(|item| {
            let (sum, count) = *totals.get(&item.id)?;
            (count >= min_ratings.max(1)).then(|| PopularItem {
                id: item.id.to_string(),
                title: item.title.clone(),
                content_type: item.content_type,
                genre: item.genre_display(),
                avg_rating: sum / count as f64,
                rating_count: count,
            })
        })
        .collect();

    popular.sort_by(|a, b| {
        b.avg_rating
            .partial_cmp(&a.avg_rating)
            .unwrap_or(Ordering::Equal)
            .then(b.rating_count.cmp(&a.rating_count))
    });
    popular.truncate(limit);
    popular
}
