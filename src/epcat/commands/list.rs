use crate::commands::page::{self, PageTarget};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::projector::{View, ViewFilter};
use crate::reconciler::Reconciler;
use crate::source::PageSource;
use crate::store::DataStore;

/// Project the catalog under `filter`.
///
/// With no filter the view is the current page, which is requested first so the
/// listing is never stale. Filtered views read only what is already in the store.
pub async fn run<S, F>(engine: &Reconciler<S, F>, filter: &ViewFilter) -> Result<CmdResult>
where
    S: DataStore + Send + 'static,
    F: PageSource + 'static,
{
    if !filter.is_active() {
        let pagination = engine.pagination();
        let current = page::resolve(PageTarget::Current, pagination.current_page, &pagination);
        engine.request_page(current).await?;
    }

    let view = engine.view(filter);
    let mut result = CmdResult::default();
    if view.episodes().is_empty() {
        result.add_message(CmdMessage::info(filter.empty_message()));
    }
    if let View::Page { .. } = view {
        result = result.with_pagination(engine.pagination());
    }
    Ok(result.with_listed_episodes(view.into_episodes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::scripted::ScriptedSource;
    use crate::store::memory::InMemoryStore;
    use std::sync::Arc;

    async fn loaded_engine() -> Reconciler<InMemoryStore, Arc<ScriptedSource>> {
        let source = Arc::new(ScriptedSource::catalog(3, 6));
        let engine = Reconciler::new(source, InMemoryStore::new());
        engine.request_page(1).await.unwrap();
        engine.request_page(2).await.unwrap();
        engine
    }

    #[tokio::test]
    async fn unfiltered_list_is_the_current_page() {
        let engine = loaded_engine().await;

        let result = run(&engine, &ViewFilter::new()).await.unwrap();

        let ids: Vec<_> = result.listed_episodes.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "5", "6"]);
        assert_eq!(result.pagination.unwrap().current_page, 2);
        assert!(result.messages.is_empty());
    }

    #[tokio::test]
    async fn restored_zero_cursor_lists_the_cached_first_page() {
        let snapshot = r#"{
            "records": {
                "1": { "id": "1", "name": "Pilot", "air_date": "December 2, 2013",
                       "code": "S01E01", "characters": [], "favorite": false, "watched": false },
                "2": { "id": "2", "name": "Lawnmower Dog", "air_date": "December 9, 2013",
                       "code": "S01E02", "characters": [], "favorite": false, "watched": false }
            },
            "pagination": { "current_page": 0, "total_pages": 1, "total_records": 2,
                            "loaded_pages": { "1": ["1", "2"] } }
        }"#;
        let source = Arc::new(ScriptedSource::catalog(2, 2));
        let engine = Reconciler::open(Arc::clone(&source), InMemoryStore::with_raw(snapshot));

        let result = run(&engine, &ViewFilter::new()).await.unwrap();

        let ids: Vec<_> = result.listed_episodes.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(result.pagination.unwrap().current_page, 1);
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn favorites_span_loaded_pages() {
        let engine = loaded_engine().await;
        engine.toggle_favorite("5").unwrap();
        engine.toggle_favorite("2").unwrap();

        let result = run(&engine, &ViewFilter::new().favorites_only()).await.unwrap();

        let ids: Vec<_> = result.listed_episodes.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "5"]);
        assert!(result.pagination.is_none());
    }

    #[tokio::test]
    async fn empty_filter_result_explains_itself() {
        let engine = loaded_engine().await;

        let result = run(&engine, &ViewFilter::new().watched_only()).await.unwrap();

        assert!(result.listed_episodes.is_empty());
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].content, "No watched episodes yet.");
    }

    #[tokio::test]
    async fn search_matches_names_case_insensitively() {
        let engine = loaded_engine().await;

        let result = run(&engine, &ViewFilter::new().with_search("episode 4"))
            .await
            .unwrap();

        assert_eq!(result.listed_episodes.len(), 1);
        assert_eq!(result.listed_episodes[0].id, "4");
    }
}
