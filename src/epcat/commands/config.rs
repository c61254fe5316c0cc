use crate::commands::{CmdMessage, CmdResult};
use crate::config::EpcatConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Read or change the settings stored in `dir`.
///
/// A rejected value is reported as an error message and nothing is written.
pub fn run(dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = EpcatConfig::load(dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => result = result.with_config(config),
        ConfigAction::ShowKey(key) => result.add_message(match config.get(&key) {
            Some(value) => CmdMessage::info(value),
            None => unknown_key(&key),
        }),
        ConfigAction::Set(key, value) => {
            if let Err(e) = config.set(&key, &value) {
                result.add_message(CmdMessage::error(e.to_string()));
                return Ok(result);
            }
            config.save(dir)?;
            let stored = config.get(&key).unwrap_or(value);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, stored)));
            result = result.with_config(config);
        }
    }
    Ok(result)
}

fn unknown_key(key: &str) -> CmdMessage {
    CmdMessage::error(format!(
        "Unknown config key: {} (expected one of: {})",
        key,
        EpcatConfig::keys().join(", ")
    ))
}
