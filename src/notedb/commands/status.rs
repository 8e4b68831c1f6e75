use crate::commands::CmdResult;
use crate::error::Result;
use crate::git::{GitSync, SyncStatus};

/// Fetches first so the divergence counts reflect the remote, then gathers
/// the timestamps and counts.
pub fn gather(git: &GitSync) -> Result<SyncStatus> {
    git.fetch()?;
    Ok(SyncStatus {
        last_commit: git.last_commit_timestamp()?,
        last_fetch: git.last_fetch_timestamp()?,
        divergence: git.divergence_from_upstream()?,
    })
}

pub fn run(git: &GitSync) -> Result<CmdResult> {
    Ok(CmdResult::default().with_status(gather(git)?))
}
