use std::collections::HashMap;

use crate::{
    ml::TfidfVectorizer,
    models::{ContentId, ContentItem, ContentRecord, ContentType, Rating},
};

/// In-memory catalog of content items with their feature vectors
///
/// Insertion order is preserved and used as the ranking tie-break.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<ContentItem>,
    index: HashMap<ContentId, usize>,
    dimension: usize,
}

impl Catalog {
    /// Builds the catalog, vectorizing every record's feature text
    ///
    /// Later records reusing an id already present are dropped.
    pub fn build(records: Vec<ContentRecord>, vectorizer: &TfidfVectorizer) -> Self {
        let mut items = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());
        let mut duplicates = 0usize;

        for record in records {
            if index.contains_key(&record.id) {
                duplicates += 1;
                tracing::warn!(content_id = %record.id, "Duplicate content id in catalog, keeping first");
                continue;
            }
            index.insert(record.id, items.len());
            items.push(record.into_item(vectorizer));
        }

        tracing::info!(
            items = items.len(),
            duplicates,
            dimension = vectorizer.dimension(),
            "Catalog vectorized"
        );

        Self {
            items,
            index,
            dimension: vectorizer.dimension(),
        }
    }

    pub fn get(&self, id: ContentId) -> Option<&ContentItem> {
        self.index.get(&id).map(|&pos| &self.items[pos])
    }

    /// Item a rating refers to
    ///
    /// `None` for orphaned references: an id missing from the catalog, or a
    /// rating whose explicit content type disagrees with the item's.
    pub fn resolve(&self, rating: &Rating) -> Option<&ContentItem> {
        self.get(rating.content_id).filter(|item| {
            rating
                .content_type
                .map_or(true, |ct| ct == item.content_type)
        })
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dimensionality shared by every feature vector
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Items in catalog order, restricted to `content_type` when given
    pub fn scoped(&self, content_type: Option<ContentType>) -> impl Iterator<Item = &ContentItem> {
        self.items
            .iter()
            .filter(move |item| content_type.map_or(true, |ct| item.content_type == ct))
    }

    /// Content types with at least one item, in canonical order
    pub fn content_types(&self) -> Vec<ContentType> {
        ContentType::ALL
            .into_iter()
            .filter(|ct| self.items.iter().any(|item| item.content_type == *ct))
            .collect()
    }
}
