//! Directory walk that finds every candidate note file under a root.

use crate::error::{NoteError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Git metadata directory.
pub const GIT_DIR: &str = ".git";
/// Store metadata directory (configuration lives here).
pub const STORE_DIR: &str = ".notedb";

pub const RESERVED_DIRS: [&str; 2] = [GIT_DIR, STORE_DIR];
pub const RESERVED_FILES: [&str; 1] = [".gitignore"];

pub fn is_reserved_dir(name: &str) -> bool {
    RESERVED_DIRS.contains(&name)
}

pub fn is_reserved_file(name: &str) -> bool {
    RESERVED_FILES.contains(&name)
}

/// Name for the temp file of an atomic write: `.<uuid>.tmp`.
pub fn write_temp_name() -> String {
    format!(".{}.tmp", Uuid::new_v4())
}

/// True for a temp file left behind by an interrupted atomic write.
pub fn is_write_temp(name: &str) -> bool {
    name.strip_prefix('.')
        .and_then(|rest| rest.strip_suffix(".tmp"))
        .is_some_and(|id| Uuid::parse_str(id).is_ok())
}

/// Collects all non-reserved files below `root`.
///
/// Traversal is depth-first over an explicit stack. Symlinked directories are
/// followed but each canonical directory is entered once, so link cycles
/// terminate. Any directory that cannot be read aborts the whole scan.
pub fn scan(root: &Path) -> Result<HashSet<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = HashSet::new();
    let mut stack = vec![root.to_path_buf()];
    seen.insert(fs::canonicalize(root).map_err(|e| NoteError::in_file(root, e.into()))?);

    while let Some(dir) = stack.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| NoteError::in_file(&dir, e.into()))?;

        for entry in entries {
            let entry = entry.map_err(|e| NoteError::in_file(&dir, e.into()))?;
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();

            let mut file_type = entry.file_type()?;
            if file_type.is_symlink() {
                match fs::metadata(&path) {
                    Ok(meta) => file_type = meta.file_type(),
                    Err(e) => {
                        log::warn!("skipping dangling symlink {}: {}", path.display(), e);
                        continue;
                    }
                }
            }

            if file_type.is_dir() {
                if is_reserved_dir(&name) {
                    continue;
                }
                let canonical =
                    fs::canonicalize(&path).map_err(|e| NoteError::in_file(&path, e.into()))?;
                if seen.insert(canonical) {
                    stack.push(path);
                } else {
                    log::debug!("already visited {}, skipping", path.display());
                }
            } else if is_write_temp(&name) {
                log::debug!("ignoring interrupted write {}", path.display());
            } else if !is_reserved_file(&name) {
                files.insert(path);
            }
        }
    }

    log::debug!("scanned {}: {} files", root.display(), files.len());
    Ok(files)
}
