use crate::model::PageInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which pages have been loaded, in what order, plus the aggregate counts
/// from the most recent response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationIndex {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_records: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    loaded_pages: BTreeMap<u32, Vec<String>>,
    fetched_at: BTreeMap<u32, DateTime<Utc>>,
}

impl Default for PaginationIndex {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_records: 0,
            has_next_page: false,
            has_prev_page: false,
            loaded_pages: BTreeMap::new(),
            fetched_at: BTreeMap::new(),
        }
    }
}

impl PaginationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the id list for `page` and take the aggregate fields from `info`.
    /// The id order is the server's result order and is kept as given.
    pub fn record_page(&mut self, page: u32, ids: Vec<String>, info: PageInfo) {
        self.loaded_pages.insert(page, ids);
        self.fetched_at.insert(page, Utc::now());
        self.total_pages = info.total_pages.max(1);
        self.total_records = info.total_records;
        self.has_next_page = info.has_next;
        self.has_prev_page = info.has_prev;
    }

    pub fn is_loaded(&self, page: u32) -> bool {
        self.loaded_pages.contains_key(&page)
    }

    /// Ordered ids for `page`, or an empty slice if it was never loaded.
    pub fn ids_for(&self, page: u32) -> &[String] {
        self.loaded_pages
            .get(&page)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn set_current_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    pub fn loaded_pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.loaded_pages.keys().copied()
    }

    pub fn fetched_at(&self, page: u32) -> Option<DateTime<Utc>> {
        self.fetched_at.get(&page).copied()
    }

    /// True once at least one response has reported real totals.
    pub fn has_totals(&self) -> bool {
        !self.loaded_pages.is_empty()
    }

    /// Clamp a requested page into `[1, total_pages]`.
    pub fn clamp_page(&self, page: u32) -> u32 {
        if self.has_totals() {
            page.clamp(1, self.total_pages.max(1))
        } else {
            page.max(1)
        }
    }

    /// The block of page numbers to offer around the current page.
    /// Returns `None` when there is nothing to paginate.
    pub fn page_window(&self, max_visible: u32) -> Option<PageWindow> {
        PageWindow::around(self.current_page, self.total_pages, max_visible)
    }
}

/// A run of consecutive page numbers centred on the current page, plus
/// whether the first/last page and gaps need to be shown outside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub current: u32,
    pub total: u32,
    pub pages: Vec<u32>,
    pub show_first: bool,
    pub leading_gap: bool,
    pub show_last: bool,
    pub trailing_gap: bool,
}

impl PageWindow {
    pub fn around(current: u32, total: u32, max_visible: u32) -> Option<Self> {
        if total <= 1 || max_visible == 0 {
            return None;
        }
        let current = current.clamp(1, total);

        let mut start = current.saturating_sub(max_visible / 2).max(1);
        let end = (start + max_visible - 1).min(total);
        if end - start + 1 < max_visible {
            start = (end + 1).saturating_sub(max_visible).max(1);
        }

        Some(Self {
            current,
            total,
            pages: (start..=end).collect(),
            show_first: start > 1,
            leading_gap: start > 2,
            show_last: end < total,
            trailing_gap: end + 1 < total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(total_pages: u32, total_records: u32, has_next: bool, has_prev: bool) -> PageInfo {
        PageInfo {
            total_pages,
            total_records,
            has_next,
            has_prev,
        }
    }

    #[test]
    fn new_index_is_empty_at_page_one() {
        let index = PaginationIndex::new();
        assert_eq!(index.current_page, 1);
        assert_eq!(index.total_pages, 1);
        assert!(!index.is_loaded(1));
        assert!(index.ids_for(1).is_empty());
    }

    #[test]
    fn record_page_keeps_server_order_and_updates_aggregates() {
        let mut index = PaginationIndex::new();
        let ids = vec!["3".to_string(), "1".to_string(), "2".to_string()];
        index.record_page(2, ids.clone(), info(3, 51, true, true));

        assert!(index.is_loaded(2));
        assert_eq!(index.ids_for(2), ids.as_slice());
        assert_eq!(index.total_pages, 3);
        assert_eq!(index.total_records, 51);
        assert!(index.has_next_page);
        assert!(index.has_prev_page);
        assert!(index.fetched_at(2).is_some());
        assert!(index.fetched_at(1).is_none());
    }

    #[test]
    fn record_page_overwrites_previous_ids_and_latest_totals_win() {
        let mut index = PaginationIndex::new();
        index.record_page(1, vec!["1".into(), "2".into()], info(3, 51, true, false));
        index.record_page(1, vec!["2".into()], info(4, 61, true, false));

        assert_eq!(index.ids_for(1), ["2".to_string()].as_slice());
        assert_eq!(index.total_pages, 4);
        assert_eq!(index.total_records, 61);
    }

    #[test]
    fn record_page_never_reports_zero_pages() {
        let mut index = PaginationIndex::new();
        index.record_page(1, Vec::new(), info(0, 0, false, false));
        assert_eq!(index.total_pages, 1);
    }

    #[test]
    fn record_page_does_not_move_the_cursor() {
        let mut index = PaginationIndex::new();
        index.set_current_page(2);
        index.record_page(3, vec!["41".into()], info(3, 51, false, true));
        assert_eq!(index.current_page, 2);
    }

    #[test]
    fn clamps_only_once_totals_are_known() {
        let mut index = PaginationIndex::new();
        assert_eq!(index.clamp_page(0), 1);
        assert_eq!(index.clamp_page(9), 9);

        index.record_page(1, vec!["1".into()], info(3, 51, true, false));
        assert_eq!(index.clamp_page(9), 3);
        assert_eq!(index.clamp_page(0), 1);
    }

    #[test]
    fn survives_json_with_missing_fields() {
        let index: PaginationIndex =
            serde_json::from_str(r#"{"current_page":2,"loaded_pages":{"2":["21","22"]}}"#).unwrap();
        assert_eq!(index.current_page, 2);
        assert_eq!(index.total_pages, 1);
        assert_eq!(index.ids_for(2).len(), 2);
    }

    #[test]
    fn window_at_start_shows_last_page() {
        let w = PageWindow::around(1, 10, 5).unwrap();
        assert_eq!(w.pages, vec![1, 2, 3, 4, 5]);
        assert!(!w.show_first);
        assert!(!w.leading_gap);
        assert!(w.show_last);
        assert!(w.trailing_gap);
    }

    #[test]
    fn window_in_the_middle_shows_both_ends() {
        let w = PageWindow::around(5, 10, 5).unwrap();
        assert_eq!(w.pages, vec![3, 4, 5, 6, 7]);
        assert!(w.show_first);
        assert!(w.leading_gap);
        assert!(w.show_last);
        assert!(w.trailing_gap);
    }

    #[test]
    fn window_at_end_shifts_left() {
        let w = PageWindow::around(10, 10, 5).unwrap();
        assert_eq!(w.pages, vec![6, 7, 8, 9, 10]);
        assert!(w.show_first);
        assert!(!w.show_last);
    }

    #[test]
    fn window_adjacent_to_edges_has_no_gap() {
        let w = PageWindow::around(4, 7, 5).unwrap();
        assert_eq!(w.pages, vec![2, 3, 4, 5, 6]);
        assert!(w.show_first);
        assert!(!w.leading_gap);
        assert!(w.show_last);
        assert!(!w.trailing_gap);
    }

    #[test]
    fn window_smaller_than_max() {
        let w = PageWindow::around(2, 3, 5).unwrap();
        assert_eq!(w.pages, vec![1, 2, 3]);
        assert!(!w.show_first && !w.show_last);
    }

    #[test]
    fn no_window_for_a_single_page() {
        assert!(PageWindow::around(1, 1, 5).is_none());
        assert!(PaginationIndex::new().page_window(5).is_none());
    }
}
