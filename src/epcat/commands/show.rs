use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::reconciler::Reconciler;
use crate::source::PageSource;
use crate::store::DataStore;

/// Look up episodes by id. Reads the store only; nothing is fetched.
pub fn run<S, F, I>(engine: &Reconciler<S, F>, ids: &[I]) -> Result<CmdResult>
where
    S: DataStore + Send + 'static,
    F: PageSource + 'static,
    I: AsRef<str>,
{
    let mut result = CmdResult::default();
    for id in ids {
        match engine.get(id.as_ref()) {
            Some(episode) => result.listed_episodes.push(episode),
            None => result.add_message(CmdMessage::warning(format!(
                "Episode {} is not in the catalog.",
                id.as_ref()
            ))),
        }
    }
    Ok(result)
}
