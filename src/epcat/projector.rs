//! # Projections
//!
//! Read-only views over the catalog state. There are exactly two:
//!
//! - **Page view**: the ids the index holds for one page, resolved through the store,
//!   in server order.
//! - **Filtered view**: every record in the store that passes a predicate. This view
//!   spans all loaded pages and is not paginated.
//!
//! [`project`] picks between them: any active [`ViewFilter`] criterion selects the
//! filtered view, otherwise the current page is shown.

use crate::catalog::{PaginationIndex, RecordStore};
use crate::model::Episode;
use std::cmp::Ordering;

/// User-entered filter criteria, combined conjunctively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub search: String,
    pub favorites_only: bool,
    pub watched_only: bool,
}

impl ViewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn favorites_only(mut self) -> Self {
        self.favorites_only = true;
        self
    }

    pub fn watched_only(mut self) -> Self {
        self.watched_only = true;
        self
    }

    /// Whether any criterion is set. An active filter switches to the store-wide view.
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.favorites_only || self.watched_only
    }

    pub fn matches(&self, episode: &Episode) -> bool {
        let matches_search = self.search.is_empty()
            || episode
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase());
        let matches_favorites = !self.favorites_only || episode.favorite;
        let matches_watched = !self.watched_only || episode.watched;
        matches_search && matches_favorites && matches_watched
    }

    /// Explanation to show when the view this filter selects comes back empty.
    pub fn empty_message(&self) -> String {
        match (self.favorites_only, self.watched_only) {
            (true, true) => "No episodes marked as favorite and watched yet.".to_string(),
            (true, false) => "No favorite episodes yet.".to_string(),
            (false, true) => "No watched episodes yet.".to_string(),
            (false, false) if !self.search.is_empty() => format!(
                "No episodes match \"{}\". Try another search term.",
                self.search
            ),
            (false, false) => "No episodes available right now.".to_string(),
        }
    }
}

/// The result of projecting the catalog for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Page { page: u32, episodes: Vec<Episode> },
    Filtered { episodes: Vec<Episode> },
}

impl View {
    pub fn episodes(&self) -> &[Episode] {
        match self {
            View::Page { episodes, .. } | View::Filtered { episodes } => episodes,
        }
    }

    pub fn into_episodes(self) -> Vec<Episode> {
        match self {
            View::Page { episodes, .. } | View::Filtered { episodes } => episodes,
        }
    }

    pub fn is_paged(&self) -> bool {
        matches!(self, View::Page { .. })
    }
}

/// The episodes of `page` in server order. Ids that no longer resolve are skipped.
pub fn current_page_view(records: &RecordStore, index: &PaginationIndex, page: u32) -> Vec<Episode> {
    index
        .ids_for(page)
        .iter()
        .filter_map(|id| records.get(id))
        .cloned()
        .collect()
}

/// Every record in the store for which `predicate` holds.
///
/// The store is unordered; results are sorted by id (numerically where the ids are
/// numbers) so repeated renders are stable.
pub fn filtered_view<P>(records: &RecordStore, predicate: P) -> Vec<Episode>
where
    P: Fn(&Episode) -> bool,
{
    let mut episodes: Vec<Episode> = records.iter().filter(|ep| predicate(ep)).cloned().collect();
    episodes.sort_by(|a, b| compare_ids(&a.id, &b.id));
    episodes
}

/// Pick the view for the current state: filtered when `filter` is active,
/// otherwise the current page.
pub fn project(records: &RecordStore, index: &PaginationIndex, filter: &ViewFilter) -> View {
    if filter.is_active() {
        View::Filtered {
            episodes: filtered_view(records, |ep| filter.matches(ep)),
        }
    } else {
        let page = index.current_page;
        View::Page {
            page,
            episodes: current_page_view(records, index, page),
        }
    }
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}
