use crate::error::{EpcatError, Result};
use crate::model::{Episode, Flag, ServerEpisode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Normalized id → episode mapping. The single source of truth for record content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore {
    episodes: HashMap<String, Episode>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge server data into the store.
    ///
    /// Known ids take the incoming server fields verbatim but keep their
    /// existing `favorite`/`watched`. Unknown ids are inserted unflagged.
    pub fn merge<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = ServerEpisode>,
    {
        for server in records {
            let (favorite, watched) = self
                .episodes
                .get(&server.id)
                .map(|existing| (existing.favorite, existing.watched))
                .unwrap_or((false, false));
            self.episodes.insert(
                server.id.clone(),
                Episode::from_server(server, favorite, watched),
            );
        }
    }

    /// Set one user flag. Never fabricates a record for an unknown id.
    pub fn set_flag(&mut self, id: &str, flag: Flag, value: bool) -> Result<()> {
        let episode = self
            .episodes
            .get_mut(id)
            .ok_or_else(|| EpcatError::FlagTargetNotFound(id.to_string()))?;
        match flag {
            Flag::Favorite => episode.favorite = value,
            Flag::Watched => episode.watched = value,
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Episode> {
        self.episodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.episodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Iterate all records. Order is arbitrary.
    pub fn iter(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.values()
    }

    pub fn count_flagged(&self, flag: Flag) -> usize {
        self.iter().filter(|ep| ep.flag(flag)).count()
    }
}
