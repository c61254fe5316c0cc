use super::{DataStore, Snapshot, SnapshotRef};
use crate::catalog::{PaginationIndex, RecordStore};
use crate::error::{EpcatError, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// In-memory storage for testing and development.
/// Does NOT persist data across processes.
///
/// The snapshot is kept serialized, so loading exercises the same decoding path as
/// the file store. Clones share the same slot, which lets a test hand one clone to
/// an engine and inspect or reuse the other.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    slot: Arc<Mutex<Option<String>>>,
    saves: Arc<AtomicUsize>,
    simulate_write_error: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw JSON, e.g. a hand-written partial or corrupted snapshot.
    pub fn with_raw(json: impl Into<String>) -> Self {
        let store = Self::new();
        *store.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(json.into());
        store
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn raw(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DataStore for InMemoryStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        match self.raw() {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        }
    }

    fn save(&mut self, records: &RecordStore, pagination: &PaginationIndex) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(EpcatError::Store("Simulated write error".to_string()));
        }
        let raw = serde_json::to_string(&SnapshotRef {
            records,
            pagination,
        })?;
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::server_episode;

    #[test]
    fn empty_store_loads_nothing() {
        assert!(InMemoryStore::new().load().unwrap().is_none());
    }

    #[test]
    fn clones_share_the_saved_snapshot() {
        let store = InMemoryStore::new();
        let mut writer = store.clone();

        let mut records = RecordStore::new();
        records.merge(vec![server_episode("1", "Pilot")]);
        writer.save(&records, &PaginationIndex::new()).unwrap();

        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap().unwrap().records, records);
    }

    #[test]
    fn simulated_write_error_keeps_previous_snapshot() {
        let mut store = InMemoryStore::new();
        store.save(&RecordStore::new(), &PaginationIndex::new()).unwrap();
        let before = store.raw();

        store.set_simulate_write_error(true);
        let mut records = RecordStore::new();
        records.merge(vec![server_episode("1", "Pilot")]);
        assert!(store.save(&records, &PaginationIndex::new()).is_err());

        assert_eq!(store.raw(), before);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn corrupted_raw_snapshot_fails_to_load() {
        let store = InMemoryStore::with_raw("[1, 2");
        assert!(store.load().is_err());
    }
}
