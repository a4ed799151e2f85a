//! Map link resolution against grounding citations.
//!
//! Matching is plain case-insensitive substring containment in both
//! directions. The first citation that matches wins; there is no scoring.

use super::types::Citation;

/// Base URL for synthesized map searches.
pub const MAP_SEARCH_BASE: &str = "https://www.google.com/maps/search/";

/// Find the map URI of the first citation whose title matches `name`.
///
/// A title matches when, lowercased, it contains the lowercased name or is
/// contained in it. Citations without a title never match. The matching
/// citation's URI is returned as-is, so a titled citation with no URI
/// yields `None` and stops the search.
pub fn find_map_uri(name: &str, citations: &[Citation]) -> Option<String> {
    let needle = name.to_lowercase();

    citations
        .iter()
        .find(|citation| match citation.title.as_deref() {
            Some(title) if !title.trim().is_empty() => {
                let title = title.to_lowercase();
                title.contains(&needle) || needle.contains(&title)
            }
            _ => false,
        })
        .and_then(|citation| citation.uri.clone())
}

/// Build a map search URL for a restaurant name.
pub fn map_search_uri(name: &str) -> String {
    format!("{}{}", MAP_SEARCH_BASE, urlencoding::encode(name))
}
