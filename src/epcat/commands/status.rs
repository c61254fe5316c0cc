use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Flag;
use crate::reconciler::{PageStatus, Reconciler};
use crate::source::PageSource;
use crate::store::DataStore;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub page: u32,
    pub episodes: usize,
    pub fetched_at: Option<DateTime<Utc>>,
    pub fetching: bool,
}

/// What the local catalog holds, and what the last response said about the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_records: u32,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub cached_episodes: usize,
    pub favorites: usize,
    pub watched: usize,
    pub pages: Vec<PageSummary>,
}

pub fn run<S, F>(engine: &Reconciler<S, F>) -> Result<CmdResult>
where
    S: DataStore + Send + 'static,
    F: PageSource + 'static,
{
    let pagination = engine.pagination();
    let pages: Vec<PageSummary> = pagination
        .loaded_pages()
        .map(|page| PageSummary {
            page,
            episodes: pagination.ids_for(page).len(),
            fetched_at: pagination.fetched_at(page),
            fetching: engine.page_status(page) == PageStatus::Fetching,
        })
        .collect();

    let report = StatusReport {
        current_page: pagination.current_page,
        total_pages: pagination.total_pages,
        total_records: pagination.total_records,
        has_prev_page: pagination.has_prev_page,
        has_next_page: pagination.has_next_page,
        cached_episodes: engine.record_count(),
        favorites: engine.count_flagged(Flag::Favorite),
        watched: engine.count_flagged(Flag::Watched),
        pages,
    };

    let mut result = CmdResult::default();
    if report.pages.is_empty() {
        result.add_message(CmdMessage::info("No pages cached yet."));
    }
    result.status = Some(report);
    Ok(result)
}
