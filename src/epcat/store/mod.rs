//! # Storage Layer
//!
//! This module defines the durability boundary for epcat. The [`DataStore`] trait
//! persists the catalog state (records + pagination index) so user flags and loaded
//! pages survive restarts.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production file-based storage
//!   - Whole catalog in `catalog.json`
//!   - Atomic writes (temp file + rename)
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!   - Keeps the serialized snapshot in a shared slot
//!   - Can simulate write failures
//!
//! ## Tolerance
//!
//! A snapshot is allowed to be incomplete. Missing fields take their defaults, and a
//! page whose ids are not all present in the records is treated by the reconciler as
//! a cache miss, not an error.

use crate::catalog::{PaginationIndex, RecordStore};
use crate::error::Result;
use serde::{Deserialize, Serialize};

pub mod fs;
pub mod memory;

/// A restored catalog state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub records: RecordStore,
    pub pagination: PaginationIndex,
}

/// Borrowed form of [`Snapshot`] used when writing, so saving never clones the store.
#[derive(Serialize)]
pub(crate) struct SnapshotRef<'a> {
    pub records: &'a RecordStore,
    pub pagination: &'a PaginationIndex,
}

/// Abstract interface for catalog persistence.
pub trait DataStore {
    /// Load the last saved state. `Ok(None)` means nothing was saved yet.
    fn load(&self) -> Result<Option<Snapshot>>;

    /// Persist the full state, replacing whatever was saved before.
    fn save(&mut self, records: &RecordStore, pagination: &PaginationIndex) -> Result<()>;
}
