use crate::store::NoteStore;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub store: NoteStore,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let store = NoteStore::new(root.clone()).with_workers(4);
        Self {
            _temp_dir: temp_dir,
            store,
            root,
        }
    }

    /// A root that is also an initialised git repository with a local identity.
    pub fn with_git() -> Self {
        let env = Self::new();
        init_repo(&env.root);
        env
    }

    /// Writes a file verbatim, bypassing the encoder.
    pub fn write_raw(&self, rel: &str, content: &str) {
        let path = self.root.join(rel);
        fs::create_dir_all(path.parent().expect("path has a parent")).expect("create dirs");
        fs::write(path, content).expect("write file");
    }
}

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

pub fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git runs");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn init_repo(dir: &Path) {
    run_git(dir, &["init", "-q", "-b", "main"]);
    configure_repo(dir);
}

/// Local identity and settings so commits and pulls work on any machine.
pub fn configure_repo(dir: &Path) {
    run_git(dir, &["config", "user.name", "Notes Test"]);
    run_git(dir, &["config", "user.email", "notes@example.com"]);
    run_git(dir, &["config", "commit.gpgsign", "false"]);
    run_git(dir, &["config", "pull.ff", "only"]);
}
