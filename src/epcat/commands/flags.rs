//! # Flag Commands
//!
//! Toggle the user-owned flags on episodes already in the store:
//! - [`favorite`]: toggles the favorite flag
//! - [`watched`]: toggles the watched flag
//!
//! Ids that are not in the store are reported as warnings; the rest still toggle.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{EpcatError, Result};
use crate::model::Flag;
use crate::reconciler::Reconciler;
use crate::source::PageSource;
use crate::store::DataStore;

pub fn favorite<S, F, I>(engine: &Reconciler<S, F>, ids: &[I]) -> Result<CmdResult>
where
    S: DataStore + Send + 'static,
    F: PageSource + 'static,
    I: AsRef<str>,
{
    toggle(engine, ids, Flag::Favorite)
}

pub fn watched<S, F, I>(engine: &Reconciler<S, F>, ids: &[I]) -> Result<CmdResult>
where
    S: DataStore + Send + 'static,
    F: PageSource + 'static,
    I: AsRef<str>,
{
    toggle(engine, ids, Flag::Watched)
}

fn toggle<S, F, I>(engine: &Reconciler<S, F>, ids: &[I], flag: Flag) -> Result<CmdResult>
where
    S: DataStore + Send + 'static,
    F: PageSource + 'static,
    I: AsRef<str>,
{
    let mut result = CmdResult::default();

    for id in ids {
        let id = id.as_ref();
        match engine.toggle_flag(id, flag) {
            Ok(now_set) => {
                if let Some(episode) = engine.get(id) {
                    result.add_message(CmdMessage::success(format!(
                        "{} {}: {}",
                        episode.code,
                        episode.name,
                        feedback(flag, now_set)
                    )));
                    result.affected_episodes.push(episode);
                }
            }
            Err(EpcatError::FlagTargetNotFound(_)) => {
                result.add_message(CmdMessage::warning(format!(
                    "Episode {} is not in the catalog. Load its page first.",
                    id
                )));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(result)
}

fn feedback(flag: Flag, now_set: bool) -> &'static str {
    match (flag, now_set) {
        (Flag::Favorite, true) => "added to favorites",
        (Flag::Favorite, false) => "removed from favorites",
        (Flag::Watched, true) => "marked as watched",
        (Flag::Watched, false) => "removed from watched",
    }
}
