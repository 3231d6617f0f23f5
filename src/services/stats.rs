use crate::{
    models::{ContentTypeBreakdown, Rating, UserId, UserStats},
    store::{Catalog, RatingStore},
};

const FAVORITE_GENRE_COUNT: usize = 5;

/// Computes descriptive statistics over a user's ratings
///
/// A user without ratings gets `UserStats::default()`, never an error.
pub fn compute_stats(catalog: &Catalog, ratings: &RatingStore, user_id: UserId) -> UserStats {
    let user_ratings: Vec<&Rating> = ratings.for_user(user_id).collect();
    if user_ratings.is_empty() {
        return UserStats::default();
    }

    let total_ratings = user_ratings.len();
    let average_rating =
        user_ratings.iter().map(|r| r.rating).sum::<f64>() / total_ratings as f64;
    let high_ratings = user_ratings.iter().filter(|r| r.is_high()).count();

    let mut breakdown = ContentTypeBreakdown::default();
    for rating in &user_ratings {
        let content_type = rating
            .content_type
            .or_else(|| catalog.resolve(rating).map(|item| item.content_type));
        if let Some(content_type) = content_type {
            breakdown.increment(content_type);
        }
    }

    let liked_genres = user_ratings
        .iter()
        .filter(|r| r.is_high())
        .filter_map(|r| catalog.resolve(r))
        .flat_map(|item| item.genres.iter().map(String::as_str));

    UserStats {
        total_ratings,
        average_rating,
        high_ratings,
        favorite_genres: top_by_frequency(liked_genres, FAVORITE_GENRE_COUNT),
        content_type_breakdown: breakdown,
        last_rated_at: user_ratings.iter().filter_map(|r| r.timestamp).max(),
    }
}

/// Most frequent values, ties broken by first appearance
fn top_by_frequency<'a>(values: impl Iterator<Item = &'a str>, n: usize) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(n)
        .map(|(value, _)| value.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentRecord, ContentType};
    use crate::services::fixtures;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_unknown_user_gets_zero_state() {
        let catalog = fixtures::abc_catalog();
        let ratings = fixtures::ratings(vec![Rating::new(1, 1, 5.0)]);

        let stats = compute_stats(&catalog, &ratings, 99);
        assert_eq!(stats.total_ratings, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.high_ratings, 0);
        assert!(stats.favorite_genres.is_empty());
        assert_eq!(stats.content_type_breakdown, ContentTypeBreakdown::default());
    }

    #[test]
    fn test_counts_and_average() {
        let catalog = fixtures::abc_catalog();
        let ratings = fixtures::ratings(vec![
            Rating::new(1, 1, 3.0),
            Rating::new(1, 2, 4.0),
            Rating::new(1, 3, 5.0),
            Rating::new(1, 1, 4.0),
        ]);

        let stats = compute_stats(&catalog, &ratings, 1);
        assert_eq!(stats.total_ratings, 4);
        assert!((stats.average_rating - 4.0).abs() < 1e-12);
        assert_eq!(stats.high_ratings, 3);
        assert_eq!(stats.content_type_breakdown.movies, 4);
    }

    #[test]
    fn test_favorite_genres_top_five_stable() {
        let catalog = fixtures::catalog(vec![
            ContentRecord::new(1, "One", "Drama|Crime|Thriller"),
            ContentRecord::new(2, "Two", "Comedy|Drama|Romance"),
            ContentRecord::new(3, "Three", "Sci-Fi|Horror|Drama|Comedy"),
            ContentRecord::new(4, "Four", "Western"),
        ]);
        let ratings = fixtures::ratings(vec![
            Rating::new(1, 1, 5.0),
            Rating::new(1, 2, 4.0),
            Rating::new(1, 3, 4.5),
            Rating::new(1, 4, 2.0),
        ]);

        let stats = compute_stats(&catalog, &ratings, 1);
        assert_eq!(
            stats.favorite_genres,
            vec!["Drama", "Comedy", "Crime", "Thriller", "Romance"]
        );
    }

    #[test]
    fn test_breakdown_prefers_rating_type_and_skips_unknown() {
        let catalog = fixtures::mixed_catalog();
        let ratings = fixtures::ratings(vec![
            Rating::new(1, 1, 5.0),
            Rating::new(1, 10001, 4.0),
            Rating::new(1, 20001, 3.0).with_content_type(ContentType::Podcast),
            Rating::new(1, 777, 3.0).with_content_type(ContentType::Book),
            Rating::new(1, 888, 3.0),
        ]);

        let breakdown = compute_stats(&catalog, &ratings, 1).content_type_breakdown;
        assert_eq!(breakdown.movies, 1);
        assert_eq!(breakdown.tv_shows, 1);
        assert_eq!(breakdown.podcasts, 1);
        assert_eq!(breakdown.books, 1);
    }

    #[test]
    fn test_orphans_count_in_totals_but_not_genres() {
        let catalog = fixtures::abc_catalog();
        let ratings = fixtures::ratings(vec![Rating::new(1, 999, 5.0), Rating::new(1, 3, 4.0)]);

        let stats = compute_stats(&catalog, &ratings, 1);
        assert_eq!(stats.total_ratings, 2);
        assert_eq!(stats.high_ratings, 2);
        assert_eq!(stats.favorite_genres, vec!["Comedy"]);
    }

    #[test]
    fn test_last_rated_at_is_latest() {
        let catalog = fixtures::abc_catalog();
        let early = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();
        let ratings = fixtures::ratings(vec![
            Rating::new(1, 1, 5.0).with_timestamp(late),
            Rating::new(1, 2, 3.0).with_timestamp(early),
            Rating::new(1, 3, 3.0),
        ]);

        assert_eq!(compute_stats(&catalog, &ratings, 1).last_rated_at, Some(late));
    }
}
