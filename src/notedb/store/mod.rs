//! # Storage Layer
//!
//! [`NoteStore`] is the facade over a notes root. It keeps nothing but the
//! root path and a couple of tuning knobs, so it is cheap to build per
//! request and safe to use from several threads.
//!
//! ## Files are Truth
//!
//! There is no index or cache. Every read walks the tree again:
//!
//! 1. [`crate::scan`] collects candidate paths (skipping `.git`, `.notedb`,
//!    `.gitignore` and leftovers of interrupted writes).
//! 2. [`pool`] decodes them in parallel with a bounded worker pool. Files
//!    that are not UTF-8 text are skipped.
//! 3. The caller gets the full listing or the first error, never a partial
//!    listing.
//!
//! Lookups by id are a linear filter over that listing. The supported corpus
//! is a personal notes folder, not a large index.
//!
//! ## Writes
//!
//! `create` and `save` re-encode the record and replace the file atomically
//! (write to a temp file next to it, then rename). `create` does not check
//! for an existing file at the target path: the last write wins.

use crate::config::{DuplicatePolicy, NoteDbConfig};
use crate::error::{NoteError, Result};
use crate::format;
use crate::model::{Record, TreeNode};
use crate::scan;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

pub mod pool;
pub mod search;
pub mod tree;

pub const DEFAULT_WORKERS: usize = 10;

#[derive(Debug, Clone)]
pub struct NoteStore {
    root: PathBuf,
    workers: usize,
    duplicates: DuplicatePolicy,
}

impl NoteStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            workers: DEFAULT_WORKERS,
            duplicates: DuplicatePolicy::default(),
        }
    }

    pub fn from_config(root: impl Into<PathBuf>, config: &NoteDbConfig) -> Self {
        Self::new(root)
            .with_workers(config.workers)
            .with_duplicate_policy(config.duplicate_ids)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Every record under the root, in no particular order.
    pub fn all_records(&self) -> Result<Vec<Record>> {
        let paths: Vec<PathBuf> = scan::scan(&self.root)?.into_iter().collect();
        let records = pool::decode_all(&paths, self.workers)?;

        if let Err(e) = check_duplicates(&records) {
            match self.duplicates {
                DuplicatePolicy::Fail => return Err(e),
                DuplicatePolicy::Report => log::warn!("{}", e),
            }
        }

        log::debug!("loaded {} records from {}", records.len(), self.root.display());
        Ok(records)
    }

    pub fn load_by_id(&self, id: &Uuid) -> Result<Record> {
        self.all_records()?
            .into_iter()
            .find(|r| r.id().as_ref() == Some(id))
            .ok_or(NoteError::NotFound(*id))
    }

    /// Ranked search; see [`search::rank`] for the ordering rules.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<Record>> {
        Ok(search::rank(self.all_records()?, query, limit))
    }

    pub fn tree_view(&self) -> Result<Vec<TreeNode>> {
        Ok(tree::build(&self.root, &self.all_records()?))
    }

    /// Writes a new note with a fresh identity at `relative_path`.
    pub fn create(&self, relative_path: &str, content: &str) -> Result<Record> {
        let path = self.resolve(relative_path)?;
        let record = Record::new(path, content.to_string());
        self.write(&record)?;
        log::info!("created {} at {}", fmt_id(&record), record.path.display());
        Ok(record)
    }

    /// Overwrites the record's file, stamping a new modification time.
    pub fn save(&self, record: &mut Record) -> Result<()> {
        record.touch();
        self.write(record)?;
        log::info!("saved {} at {}", fmt_id(record), record.path.display());
        Ok(())
    }

    fn write(&self, record: &Record) -> Result<()> {
        let dir = record
            .path
            .parent()
            .ok_or_else(|| NoteError::InvalidPath(record.path.display().to_string()))?;
        fs::create_dir_all(dir).map_err(|e| NoteError::in_file(dir, e.into()))?;

        let tmp = dir.join(scan::write_temp_name());
        fs::write(&tmp, format::encode(record)).map_err(|e| NoteError::in_file(&tmp, e.into()))?;
        fs::rename(&tmp, &record.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            NoteError::in_file(&record.path, e.into())
        })?;
        Ok(())
    }

    /// Maps a caller-supplied relative path onto the root, refusing anything
    /// that would land outside it or inside reserved metadata.
    fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        let rel = Path::new(relative_path);
        let mut clean = PathBuf::new();
        for component in rel.components() {
            match component {
                Component::Normal(part) => {
                    let name = part.to_string_lossy();
                    if scan::is_reserved_dir(&name) || scan::is_reserved_file(&name) {
                        return Err(NoteError::InvalidPath(format!(
                            "{} uses reserved name {}",
                            relative_path, name
                        )));
                    }
                    clean.push(part);
                }
                Component::CurDir => {}
                _ => {
                    return Err(NoteError::InvalidPath(format!(
                        "{} must be relative to the notes root",
                        relative_path
                    )))
                }
            }
        }
        if clean.as_os_str().is_empty() {
            return Err(NoteError::InvalidPath("empty path".into()));
        }
        Ok(self.root.join(clean))
    }
}

/// Fails with the first pair of records that share an id.
pub fn check_duplicates(records: &[Record]) -> Result<()> {
    let mut seen: HashMap<Uuid, &Path> = HashMap::with_capacity(records.len());
    for record in records {
        let Some(id) = record.id() else { continue };
        if let Some(first) = seen.insert(id, &record.path) {
            return Err(NoteError::DuplicateIdentity {
                id,
                first: first.to_path_buf(),
                second: record.path.clone(),
            });
        }
    }
    Ok(())
}

fn fmt_id(record: &Record) -> String {
    record
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "header-less note".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    #[test]
    fn create_then_load_by_id() {
        let env = TestEnv::new();
        let created = env.store.create("work/todo.txt", "buy milk\n").unwrap();

        assert_eq!(created.path, env.root.join("work/todo.txt"));
        let loaded = env.store.load_by_id(&created.id().unwrap()).unwrap();
        assert_eq!(loaded, created);
    }

    #[test]
    fn load_by_unknown_id_is_not_found() {
        let env = TestEnv::new();
        env.store.create("a.txt", "a").unwrap();
        let id = Uuid::new_v4();
        let err = env.store.load_by_id(&id).unwrap_err();
        assert!(matches!(err, NoteError::NotFound(missing) if missing == id));
    }

    #[test]
    fn create_overwrites_existing_file() {
        let env = TestEnv::new();
        let first = env.store.create("a.txt", "one").unwrap();
        let second = env.store.create("a.txt", "two").unwrap();

        let all = env.store.all_records().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id(), second.id());
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn create_rejects_escaping_paths() {
        let env = TestEnv::new();
        for bad in ["../outside.txt", "/etc/passwd", ".git/config", "x/.notedb/y", "", "."] {
            let err = env.store.create(bad, "x").unwrap_err();
            assert!(matches!(err, NoteError::InvalidPath(_)), "{} -> {:?}", bad, err);
        }
    }

    #[test]
    fn save_rewrites_content_and_modified_time() {
        let env = TestEnv::new();
        let mut record = env.store.create("a.txt", "draft").unwrap();
        if let Some(h) = record.header.as_mut() {
            h.modified_at = Some(h.created_at - chrono::Duration::days(1));
        }
        record.content = "final".into();
        env.store.save(&mut record).unwrap();

        let loaded = env.store.load_by_id(&record.id().unwrap()).unwrap();
        assert_eq!(loaded.content, "final");
        assert!(loaded.modified_at().unwrap() >= loaded.created_at().unwrap());
        assert_eq!(loaded.created_at(), record.created_at());
    }

    #[test]
    fn no_temp_files_left_behind() {
        let env = TestEnv::new();
        env.store.create("inbox/a.txt", "a").unwrap();
        let leftovers: Vec<_> = fs::read_dir(env.root.join("inbox"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn all_records_skips_reserved_entries() {
        let env = TestEnv::new();
        env.store.create("a.txt", "a").unwrap();
        env.write_raw(".git/objects/ab", "blob");
        env.write_raw(".gitignore", "*.tmp\n");

        let all = env.store.all_records().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name(), "a.txt");
    }

    #[test]
    fn binary_sibling_does_not_break_listing() {
        let env = TestEnv::new();
        let todo = env.store.create("todo.txt", "buy milk\n").unwrap();
        fs::write(
            env.root.join(".DS_Store"),
            [0u8, 0, 0, 1, 0x42, 0x75, 0xff, 0xfe],
        )
        .unwrap();

        let all = env.store.all_records().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id(), todo.id());
        assert_eq!(env.store.search("todo", 5).unwrap().len(), 1);
        assert!(env.store.load_by_id(&todo.id().unwrap()).is_ok());
    }

    #[test]
    fn headerless_files_are_listed_without_identity() {
        let env = TestEnv::new();
        env.write_raw("legacy.txt", "old note\n");

        let all = env.store.all_records().unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].id().is_none());
        assert_eq!(all[0].content, "old note\n");
    }

    #[test]
    fn corrupt_file_fails_whole_listing() {
        let env = TestEnv::new();
        env.store.create("good.txt", "fine").unwrap();
        let mut bad = env.store.create("bad.txt", "original").unwrap();
        bad.content = "edited by hand".into();
        let tampered = format::encode(&bad).replace("edited by hand", "hand edit");
        env.write_raw("bad.txt", &tampered);

        let err = env.store.all_records().unwrap_err();
        assert!(matches!(err.root_cause(), NoteError::IntegrityMismatch { .. }));
    }

    #[test]
    fn duplicate_policy_controls_listing() {
        let env = TestEnv::new();
        let original = env.store.create("a.txt", "same").unwrap();
        let copy = fs::read_to_string(&original.path).unwrap();
        env.write_raw("copy.txt", &copy);

        assert_eq!(env.store.all_records().unwrap().len(), 2);

        let strict = env.store.clone().with_duplicate_policy(DuplicatePolicy::Fail);
        let err = strict.all_records().unwrap_err();
        assert!(matches!(err, NoteError::DuplicateIdentity { id, .. } if Some(id) == original.id()));
    }

    #[test]
    fn search_and_tree_use_fresh_listing() {
        let env = TestEnv::new();
        env.store.create("todo.txt", "buy milk").unwrap();
        env.store.create("misc/notes.txt", "remember todo").unwrap();

        let found = env.store.search("todo", 5).unwrap();
        let names: Vec<String> = found.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["todo.txt", "notes.txt"]);

        let tree = env.store.tree_view().unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "todo.txt");
        assert_eq!(tree[1].name, "misc");
    }
}
