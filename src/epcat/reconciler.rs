//! # Reconciler
//!
//! The engine that keeps the local catalog consistent with the remote source.
//!
//! ## Page Requests
//!
//! Every [`Reconciler::request_page`] call walks the same path:
//!
//! ```text
//! Idle → Checking ─┬─ CacheHit ──────────────→ Settled
//!                  └─ Fetching ─┬─ success ─→ Settled
//!                               └─ failure ─→ Failed
//! ```
//!
//! - **Checking**: the page is a hit only if the index has it *and* every id it lists
//!   resolves in the record store. A page whose ids dangle (a partially written
//!   snapshot) is logged and refetched.
//! - **CacheHit**: the page is rebuilt from the store. No network access.
//! - **Fetching**: the source is asked for the page. On success the records are merged
//!   (user flags kept), the page's ids are recorded in result order, and the state is
//!   saved, all under one lock. On failure nothing is written.
//!
//! ## In-flight Fetches
//!
//! Fetches run as their own tasks and are tracked in a map keyed by page number.
//! A request for a page that is already being fetched waits on the same result
//! instead of fetching again. Requests for other pages are unaffected. A fetch whose
//! requester went away (navigated elsewhere, dropped its future) still completes and
//! commits; its entry is cleared when it settles.
//!
//! ## Writers
//!
//! The record store and index change in exactly three places: the fetch commit, the
//! flag update, and the navigation cursor. Saving happens after the first two.

use crate::catalog::{PaginationIndex, RecordStore};
use crate::error::{EpcatError, Result};
use crate::model::{Episode, Flag};
use crate::projector::{self, View, ViewFilter};
use crate::source::{FetchedPage, PageSource};
use crate::store::DataStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Where the episodes of a settled page request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Rebuilt from the local store.
    Cache,
    /// This request started the fetch.
    Network,
    /// Attached to a fetch another request had already started.
    Joined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLoad {
    pub page: u32,
    pub episodes: Vec<Episode>,
    pub origin: LoadOrigin,
}

/// Loading state of a single page, bound to the page number rather than to
/// whichever request started the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    NotLoaded,
    Fetching,
    Loaded,
}

type Settlement = std::result::Result<Vec<Episode>, String>;
type Pending = watch::Receiver<Option<Settlement>>;

enum Step {
    Cached(Vec<Episode>),
    Join(Pending),
    Fetch(Pending),
}

struct CatalogState<S> {
    records: RecordStore,
    pagination: PaginationIndex,
    durability: S,
}

impl<S: DataStore> CatalogState<S> {
    fn persist(&mut self) {
        if let Err(e) = self.durability.save(&self.records, &self.pagination) {
            warn!(error = %e, "failed to persist catalog");
        }
    }

    /// The page's episodes, if the page is loaded and every id still resolves.
    fn cached_page(&self, page: u32) -> Option<Vec<Episode>> {
        if !self.pagination.is_loaded(page) {
            return None;
        }
        let episodes: Option<Vec<Episode>> = self
            .pagination
            .ids_for(page)
            .iter()
            .map(|id| self.records.get(id).cloned())
            .collect();
        if episodes.is_none() {
            warn!(page, "cached page references missing episodes, forcing refetch");
        }
        episodes
    }
}

struct Shared<S, F> {
    source: F,
    state: Mutex<CatalogState<S>>,
    in_flight: Mutex<HashMap<u32, Pending>>,
}

impl<S: DataStore, F> Shared<S, F> {
    fn state(&self) -> MutexGuard<'_, CatalogState<S>> {
        lock(&self.state)
    }

    fn commit(&self, page: u32, outcome: Result<FetchedPage>) -> Settlement {
        match outcome {
            Ok(fetched) => {
                let ids = fetched.ids();
                let mut state = self.state();
                state.records.merge(fetched.records);
                state.pagination.record_page(page, ids.clone(), fetched.info);
                state.persist();
                info!(page, episodes = ids.len(), "committed fetched page");
                Ok(ids
                    .iter()
                    .filter_map(|id| state.records.get(id).cloned())
                    .collect())
            }
            Err(e) => {
                warn!(page, error = %e, "page fetch failed");
                Err(e.to_string())
            }
        }
    }
}

/// Clears a page's in-flight entry when its fetch task ends, however it ends.
struct InFlightEntry<S, F> {
    shared: Arc<Shared<S, F>>,
    page: u32,
}

impl<S, F> Drop for InFlightEntry<S, F> {
    fn drop(&mut self) {
        lock(&self.shared.in_flight).remove(&self.page);
    }
}

/// Handle to the catalog engine. Clones share the same state.
pub struct Reconciler<S, F> {
    shared: Arc<Shared<S, F>>,
}

impl<S, F> Clone for Reconciler<S, F> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S, F> Reconciler<S, F>
where
    S: DataStore + Send + 'static,
    F: PageSource + 'static,
{
    /// An engine with an empty catalog. Nothing is loaded from `durability`.
    pub fn new(source: F, durability: S) -> Self {
        Self::from_parts(source, durability, RecordStore::new(), PaginationIndex::new())
    }

    /// An engine hydrated from whatever `durability` holds.
    ///
    /// A first run (nothing saved) starts empty. A snapshot that cannot be read is
    /// logged and also starts empty.
    pub fn open(source: F, durability: S) -> Self {
        let (records, pagination) = match durability.load() {
            Ok(Some(snapshot)) => {
                info!(
                    episodes = snapshot.records.len(),
                    pages = snapshot.pagination.loaded_pages().count(),
                    "restored catalog"
                );
                let mut pagination = snapshot.pagination;
                pagination.set_current_page(pagination.current_page);
                (snapshot.records, pagination)
            }
            Ok(None) => (RecordStore::new(), PaginationIndex::new()),
            Err(e) => {
                warn!(error = %e, "could not restore saved catalog, starting empty");
                (RecordStore::new(), PaginationIndex::new())
            }
        };
        Self::from_parts(source, durability, records, pagination)
    }

    fn from_parts(
        source: F,
        durability: S,
        records: RecordStore,
        pagination: PaginationIndex,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                state: Mutex::new(CatalogState {
                    records,
                    pagination,
                    durability,
                }),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Navigate to `page` and produce its episodes in display order.
    ///
    /// Page 0 is read as page 1. Callers clamp to the known upper bound.
    pub async fn request_page(&self, page: u32) -> Result<PageLoad> {
        let page = page.max(1);
        self.shared.state().pagination.set_current_page(page);

        let (mut pending, origin) = match self.begin(page) {
            Step::Cached(episodes) => {
                debug!(page, "serving page from cache");
                return Ok(PageLoad {
                    page,
                    episodes,
                    origin: LoadOrigin::Cache,
                });
            }
            Step::Join(pending) => {
                debug!(page, "joining in-flight fetch");
                (pending, LoadOrigin::Joined)
            }
            Step::Fetch(pending) => (pending, LoadOrigin::Network),
        };

        let settled = match pending.wait_for(Option::is_some).await {
            Ok(value) => Option::clone(&value),
            Err(_) => None,
        };
        let Some(settlement) = settled else {
            return Err(EpcatError::FetchFailed {
                page,
                message: "fetch ended without a result".to_string(),
            });
        };

        match settlement {
            Ok(episodes) => Ok(PageLoad {
                page,
                episodes,
                origin,
            }),
            Err(message) => Err(EpcatError::FetchFailed { page, message }),
        }
    }

    fn begin(&self, page: u32) -> Step {
        let mut in_flight = lock(&self.shared.in_flight);

        if let Some(episodes) = self.shared.state().cached_page(page) {
            return Step::Cached(episodes);
        }
        if let Some(pending) = in_flight.get(&page) {
            return Step::Join(pending.clone());
        }

        let (tx, rx) = watch::channel(None);
        in_flight.insert(page, rx.clone());
        drop(in_flight);

        debug!(page, "fetching page");
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let entry = InFlightEntry {
                shared: Arc::clone(&shared),
                page,
            };
            let outcome = shared.source.fetch_page(page).await;
            let settlement = shared.commit(page, outcome);
            drop(entry);
            let _ = tx.send(Some(settlement));
        });

        Step::Fetch(rx)
    }

    pub fn toggle_favorite(&self, id: &str) -> Result<bool> {
        self.toggle_flag(id, Flag::Favorite)
    }

    pub fn toggle_watched(&self, id: &str) -> Result<bool> {
        self.toggle_flag(id, Flag::Watched)
    }

    /// Negate `flag` on episode `id` and return the new value.
    pub fn toggle_flag(&self, id: &str, flag: Flag) -> Result<bool> {
        let mut state = self.shared.state();
        let Some(current) = state.records.get(id).map(|ep| ep.flag(flag)) else {
            warn!(id, %flag, "flag toggle ignored, episode not in catalog");
            return Err(EpcatError::FlagTargetNotFound(id.to_string()));
        };
        state.records.set_flag(id, flag, !current)?;
        state.persist();
        Ok(!current)
    }

    pub fn set_flag(&self, id: &str, flag: Flag, value: bool) -> Result<()> {
        let mut state = self.shared.state();
        if let Err(e) = state.records.set_flag(id, flag, value) {
            warn!(id, %flag, "flag update ignored, episode not in catalog");
            return Err(e);
        }
        state.persist();
        Ok(())
    }

    /// Project the catalog for display under `filter`.
    pub fn view(&self, filter: &ViewFilter) -> View {
        let state = self.shared.state();
        projector::project(&state.records, &state.pagination, filter)
    }

    pub fn current_page(&self) -> u32 {
        self.shared.state().pagination.current_page
    }

    pub fn pagination(&self) -> PaginationIndex {
        self.shared.state().pagination.clone()
    }

    pub fn get(&self, id: &str) -> Option<Episode> {
        self.shared.state().records.get(id).cloned()
    }

    pub fn record_count(&self) -> usize {
        self.shared.state().records.len()
    }

    pub fn count_flagged(&self, flag: Flag) -> usize {
        self.shared.state().records.count_flagged(flag)
    }

    pub fn is_fetching(&self, page: u32) -> bool {
        lock(&self.shared.in_flight).contains_key(&page)
    }

    pub fn page_status(&self, page: u32) -> PageStatus {
        if self.is_fetching(page) {
            PageStatus::Fetching
        } else if self.shared.state().pagination.is_loaded(page) {
            PageStatus::Loaded
        } else {
            PageStatus::NotLoaded
        }
    }

    /// Save the current state, including the navigation cursor.
    ///
    /// Fetches still in flight keep running and commit on their own.
    pub fn shutdown(&self) -> Result<()> {
        let mut state = self.shared.state();
        let CatalogState {
            records,
            pagination,
            durability,
        } = &mut *state;
        durability.save(records, pagination)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
