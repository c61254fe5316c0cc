use super::{FetchedPage, PageSource};
use crate::catalog::fixtures::catalog_page;
use crate::error::{EpcatError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;

/// A page source backed by canned pages, for tests.
///
/// - `fail_next(page)` makes the next fetch of that page fail once.
/// - `hold(page)` returns a semaphore with no permits; fetches of that page wait
///   until the test adds one.
/// - Every call is recorded, so tests can assert how many fetches happened.
#[derive(Default)]
pub struct ScriptedSource {
    pages: Mutex<HashMap<u32, FetchedPage>>,
    failures: Mutex<HashSet<u32>>,
    gates: Mutex<HashMap<u32, Arc<Semaphore>>>,
    calls: Mutex<Vec<u32>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source serving a sequentially numbered catalog.
    pub fn catalog(per_page: u32, total: u32) -> Self {
        let source = Self::new();
        let total_pages = total.div_ceil(per_page).max(1);
        for page in 1..=total_pages {
            let (records, info) = catalog_page(page, per_page, total);
            source.set_page(page, FetchedPage { records, info });
        }
        source
    }

    pub fn set_page(&self, page: u32, fetched: FetchedPage) {
        lock(&self.pages).insert(page, fetched);
    }

    pub fn fail_next(&self, page: u32) {
        lock(&self.failures).insert(page);
    }

    pub fn hold(&self, page: u32) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        lock(&self.gates).insert(page, gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<u32> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn calls_for(&self, page: u32) -> usize {
        lock(&self.calls).iter().filter(|p| **p == page).count()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_page(&self, page: u32) -> Result<FetchedPage> {
        lock(&self.calls).push(page);

        let gate = lock(&self.gates).get(&page).cloned();
        if let Some(gate) = gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| EpcatError::Source(e.to_string()))?;
            permit.forget();
        }

        if lock(&self.failures).remove(&page) {
            return Err(EpcatError::Source(format!("scripted failure for page {}", page)));
        }

        lock(&self.pages)
            .get(&page)
            .cloned()
            .ok_or_else(|| EpcatError::Source(format!("no such page: {}", page)))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
