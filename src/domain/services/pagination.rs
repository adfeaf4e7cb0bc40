//! Local pagination and name filtering over full member lists

use crate::domain::entities::EntitySummary;

/// A window cut out of a list that the remote does not paginate itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPage<T> {
    pub items: Vec<T>,
    /// Length of the full list
    pub total: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Slice `[offset, offset + limit)` out of `all`.
///
/// `has_next` holds iff `offset + limit < total`; `has_previous` iff
/// `offset > 0`. An offset past the end yields an empty window.
pub fn paginate_locally<T>(all: Vec<T>, offset: u32, limit: u32) -> LocalPage<T> {
    let total = u32::try_from(all.len()).unwrap_or(u32::MAX);
    let end = u64::from(offset) + u64::from(limit);
    let items = all
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    LocalPage {
        items,
        total,
        has_next: end < u64::from(total),
        has_previous: offset > 0,
    }
}

/// Keep the summaries whose name contains `fragment`, ignoring case.
/// Input order is preserved.
pub fn filter_by_name_fragment(
    candidates: Vec<EntitySummary>,
    fragment: &str,
) -> Vec<EntitySummary> {
    let needle = fragment.trim().to_lowercase();
    candidates
        .into_iter()
        .filter(|summary| summary.name.to_lowercase().contains(&needle))
        .collect()
}
