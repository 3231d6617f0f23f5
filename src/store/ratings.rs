use std::collections::{HashMap, HashSet};

use crate::models::{ContentId, Rating, UserId};

/// In-memory rating history indexed by user
///
/// Rows are kept exactly as loaded, including repeated `(user, item)` pairs.
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    ratings: Vec<Rating>,
    by_user: HashMap<UserId, Vec<usize>>,
}

impl RatingStore {
    pub fn new(ratings: Vec<Rating>) -> Self {
        let mut by_user: HashMap<UserId, Vec<usize>> = HashMap::new();
        for (pos, rating) in ratings.iter().enumerate() {
            by_user.entry(rating.user_id).or_default().push(pos);
        }
        Self { ratings, by_user }
    }

    /// All ratings of `user_id`, in load order
    pub fn for_user(&self, user_id: UserId) -> impl Iterator<Item = &Rating> {
        self.by_user
            .get(&user_id)
            .into_iter()
            .flatten()
            .map(|&pos| &self.ratings[pos])
    }

    /// Ids of every item the user has rated, at any value
    pub fn rated_ids(&self, user_id: UserId) -> HashSet<ContentId> {
        self.for_user(user_id).map(|r| r.content_id).collect()
    }

    pub fn all(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }
}
