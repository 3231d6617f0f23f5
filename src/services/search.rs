use crate::{
    models::{ContentSummary, ContentType},
    store::Catalog,
};

/// Case-insensitive substring search over titles
///
/// Results come back in catalog order. A blank query matches nothing.
pub fn search_content(
    catalog: &Catalog,
    query: &str,
    content_type: Option<ContentType>,
    limit: usize,
) -> Vec<ContentSummary> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    catalog
        .scoped(content_type)
        .filter(|item| item.title.to_lowercase().contains(&needle))
        .take(limit)
        .map(ContentSummary::from)
        .collect()
}
