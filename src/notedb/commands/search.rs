use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NoteError, Result};
use crate::store::NoteStore;

pub fn run(store: &NoteStore, query: &str, limit: usize) -> Result<CmdResult> {
    if query.trim().is_empty() {
        return Err(NoteError::Api("Search query cannot be empty".into()));
    }

    let found = store.search(query, limit)?;
    let mut result = CmdResult::default();
    if found.is_empty() {
        result.add_message(CmdMessage::info(format!("No notes match \"{}\".", query)));
    }
    Ok(result.with_listed_records(found))
}
