use crate::commands::{CmdMessage, CmdResult};
use crate::config::NoteDbConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(root: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = NoteDbConfig::load(root)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => {
            for key in NoteDbConfig::KEYS {
                result.add_message(CmdMessage::info(format!("{} = {}", key, config.get(key)?)));
            }
        }
        ConfigAction::ShowKey(key) => {
            result.add_message(CmdMessage::info(format!("{} = {}", key, config.get(&key)?)));
        }
        ConfigAction::Set(key, value) => {
            config.set(&key, &value)?;
            config.save(root)?;
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key,
                config.get(&key)?
            )));
        }
    }

    Ok(result.with_config(config))
}
