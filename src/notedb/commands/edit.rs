use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::git::GitSync;
use crate::store::NoteStore;
use uuid::Uuid;

pub fn run(
    store: &NoteStore,
    git: Option<&GitSync>,
    id: &Uuid,
    content: String,
) -> Result<CmdResult> {
    let mut record = store.load_by_id(id)?;
    record.update(content);
    store.save(&mut record)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Saved {}", record.name())));

    if let Some(git) = git {
        if git.commit(&format!("notedb: saving updated note {}", id))? {
            result.add_message(CmdMessage::info("Committed."));
        }
    }

    Ok(result.with_affected_records(vec![record]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoteError;
    use crate::test_utils::TestEnv;

    #[test]
    fn replaces_content_keeping_identity() {
        let env = TestEnv::new();
        let created = env.store.create("a.txt", "before").unwrap();
        let id = created.id().unwrap();

        let result = run(&env.store, None, &id, "after".into()).unwrap();
        assert_eq!(result.affected_records[0].content, "after");

        let loaded = env.store.load_by_id(&id).unwrap();
        assert_eq!(loaded.content, "after");
        assert_eq!(loaded.created_at(), created.created_at());
        assert_eq!(loaded.path, created.path);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let env = TestEnv::new();
        let err = run(&env.store, None, &Uuid::new_v4(), "x".into()).unwrap_err();
        assert!(matches!(err, NoteError::NotFound(_)));
    }
}
