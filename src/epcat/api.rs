//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single entry
//! point for all epcat operations, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the engine and the data directory
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (trims ids, drops blanks and duplicates)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O operations**: No stdout, stderr, or terminal concerns
//!
//! ## Generic Over Collaborators
//!
//! `EpcatApi<S, F>` is generic over the storage backend and the page source:
//! - Production: `EpcatApi<FileStore, GraphqlSource>`
//! - Testing: `EpcatApi<InMemoryStore, Arc<ScriptedSource>>`

use crate::commands;
use crate::error::Result;
use crate::projector::ViewFilter;
use crate::reconciler::Reconciler;
use crate::source::PageSource;
use crate::store::DataStore;
use std::collections::HashSet;
use std::path::PathBuf;

/// The main API facade for epcat operations.
pub struct EpcatApi<S, F> {
    engine: Reconciler<S, F>,
    data_dir: PathBuf,
}

impl<S, F> EpcatApi<S, F>
where
    S: DataStore + Send + 'static,
    F: PageSource + 'static,
{
    /// Hydrate the engine from `store` and wrap it.
    pub fn open(source: F, store: S, data_dir: PathBuf) -> Self {
        Self {
            engine: Reconciler::open(source, store),
            data_dir,
        }
    }

    pub async fn page(&self, target: PageTarget) -> Result<commands::CmdResult> {
        commands::page::run(&self.engine, target).await
    }

    pub async fn list(&self, filter: &ViewFilter) -> Result<commands::CmdResult> {
        commands::list::run(&self.engine, filter).await
    }

    pub fn show<I: AsRef<str>>(&self, ids: &[I]) -> Result<commands::CmdResult> {
        commands::show::run(&self.engine, &normalize_ids(ids))
    }

    pub fn favorite<I: AsRef<str>>(&self, ids: &[I]) -> Result<commands::CmdResult> {
        commands::flags::favorite(&self.engine, &normalize_ids(ids))
    }

    pub fn watched<I: AsRef<str>>(&self, ids: &[I]) -> Result<commands::CmdResult> {
        commands::flags::watched(&self.engine, &normalize_ids(ids))
    }

    pub fn status(&self) -> Result<commands::CmdResult> {
        commands::status::run(&self.engine)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.data_dir, action)
    }

    /// Save the final state. Call once when the client exits.
    pub fn shutdown(&self) -> Result<()> {
        self.engine.shutdown()
    }
}

/// Trim ids and drop blanks and repeats, keeping first-seen order.
fn normalize_ids<I: AsRef<str>>(inputs: &[I]) -> Vec<String> {
    let mut seen = HashSet::new();
    inputs
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_string()))
        .map(str::to_string)
        .collect()
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::page::PageTarget;
pub use crate::commands::status::{PageSummary, StatusReport};
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::scripted::ScriptedSource;
    use crate::store::memory::InMemoryStore;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn normalize_ids_trims_and_dedupes() {
        let ids = normalize_ids(&[" 3", "1", "", "3 ", "2"]);
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[tokio::test]
    async fn flags_survive_a_reopen() {
        let dir = tempdir().unwrap();
        let store = InMemoryStore::new();
        let source = Arc::new(ScriptedSource::catalog(2, 4));

        let api = EpcatApi::open(Arc::clone(&source), store.clone(), dir.path().to_path_buf());
        api.page(PageTarget::Current).await.unwrap();
        api.favorite(&["2"]).unwrap();
        api.shutdown().unwrap();

        let reopened = EpcatApi::open(Arc::clone(&source), store, dir.path().to_path_buf());
        let result = reopened.list(&ViewFilter::new().favorites_only()).await.unwrap();
        assert_eq!(result.listed_episodes.len(), 1);
        assert_eq!(result.listed_episodes[0].id, "2");
        assert_eq!(source.call_count(), 1);
    }
}
