use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::git::GitSync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAction {
    Push,
    Pull,
    Fetch,
}

pub fn run(git: &GitSync, action: RemoteAction) -> Result<CmdResult> {
    let done = match action {
        RemoteAction::Push => git.push().map(|_| "Pushed."),
        RemoteAction::Pull => git.pull().map(|_| "Pulled."),
        RemoteAction::Fetch => git.fetch().map(|_| "Fetched."),
    }?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(done));
    Ok(result)
}
