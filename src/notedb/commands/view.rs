use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::NoteStore;
use uuid::Uuid;

pub fn run(store: &NoteStore, id: &Uuid) -> Result<CmdResult> {
    let record = store.load_by_id(id)?;
    Ok(CmdResult::default().with_listed_records(vec![record]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    #[test]
    fn views_by_id() {
        let env = TestEnv::new();
        env.store.create("a.txt", "alpha").unwrap();
        let b = env.store.create("b.txt", "beta").unwrap();

        let result = run(&env.store, &b.id().unwrap()).unwrap();
        assert_eq!(result.listed_records.len(), 1);
        assert_eq!(result.listed_records[0].content, "beta");
    }
}
