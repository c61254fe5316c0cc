use crate::catalog::PaginationIndex;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::projector::ViewFilter;
use crate::reconciler::{LoadOrigin, Reconciler};
use crate::source::PageSource;
use crate::store::DataStore;
use tracing::debug;

/// Where to navigate, relative to the current cursor or absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    Current,
    Number(u32),
    Next,
    Prev,
}

/// Resolve `target` against the cursor, clamped to the known page range.
pub fn resolve(target: PageTarget, current: u32, pagination: &PaginationIndex) -> u32 {
    let wanted = match target {
        PageTarget::Current => current,
        PageTarget::Number(n) => n,
        PageTarget::Next => current.saturating_add(1),
        PageTarget::Prev => current.saturating_sub(1),
    };
    pagination.clamp_page(wanted)
}

pub async fn run<S, F>(engine: &Reconciler<S, F>, target: PageTarget) -> Result<CmdResult>
where
    S: DataStore + Send + 'static,
    F: PageSource + 'static,
{
    let pagination = engine.pagination();
    let page = resolve(target, pagination.current_page, &pagination);
    debug!(?target, page, "navigating");

    let load = engine.request_page(page).await?;

    let mut result = CmdResult::default().with_pagination(engine.pagination());
    if load.episodes.is_empty() {
        result.add_message(CmdMessage::info(ViewFilter::new().empty_message()));
    }
    if load.origin == LoadOrigin::Joined {
        result.add_message(CmdMessage::info(format!(
            "page {} was already loading, showing that result",
            page
        )));
    }
    Ok(result.with_listed_episodes(load.episodes))
}
