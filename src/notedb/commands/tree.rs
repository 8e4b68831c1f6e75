use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::NoteStore;

pub fn run(store: &NoteStore, expanded: bool) -> Result<CmdResult> {
    let mut tree = store.tree_view()?;
    if expanded {
        tree.iter_mut().for_each(|node| node.expand_all());
    }

    let mut result = CmdResult::default();
    if tree.is_empty() {
        result.add_message(CmdMessage::info("No notes found."));
    }
    Ok(result.with_tree(tree))
}
