use crate::commands::{doctor, CmdMessage, CmdResult};
use crate::error::Result;
use crate::git::GitSync;
use crate::model::now_seconds;
use crate::store::NoteStore;

/// Repairs headers, commits everything and pushes when there was something
/// to commit.
pub fn run(store: &NoteStore, git: &GitSync) -> Result<CmdResult> {
    let report = doctor::repair(store)?;
    let mut result = CmdResult::default();
    if !report.headers_added.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Added headers to {} note(s).",
            report.headers_added.len()
        )));
    }

    let message = format!("notedb sync - {}", now_seconds().timestamp());
    if !git.commit(&message)? {
        result.add_message(CmdMessage::info("Nothing to commit, not pushing."));
        return Ok(result);
    }

    git.push()?;
    result.add_message(CmdMessage::success("Committed and pushed."));
    Ok(result.with_affected_records(report.headers_added))
}
