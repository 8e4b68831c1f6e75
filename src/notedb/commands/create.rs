use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NoteError, Result};
use crate::git::GitSync;
use crate::store::NoteStore;

/// Bare names (no directory part) are filed under `default_folder`.
pub fn note_path(requested: &str, default_folder: &str) -> Result<String> {
    let requested = requested.trim();
    if requested.is_empty() {
        return Err(NoteError::Api("Note path cannot be empty".into()));
    }
    if requested.contains('/') {
        Ok(requested.to_string())
    } else {
        Ok(format!("{}/{}", default_folder, requested))
    }
}

pub fn run(
    store: &NoteStore,
    git: Option<&GitSync>,
    default_folder: &str,
    requested: &str,
    content: &str,
) -> Result<CmdResult> {
    let path = note_path(requested, default_folder)?;
    let record = store.create(&path, content)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Created note at {}", path)));

    if let Some(git) = git {
        if git.commit(&format!("notedb: saving note at {}", path))? {
            result.add_message(CmdMessage::info("Committed."));
        }
    }

    Ok(result.with_affected_records(vec![record]))
}
