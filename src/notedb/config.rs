use crate::error::{NoteError, Result};
use crate::scan::STORE_DIR;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_WORKERS: usize = 10;
const DEFAULT_SEARCH_LIMIT: usize = 5;
const DEFAULT_FOLDER: &str = "unfiled";

/// What `all_records` does when two files carry the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Log a warning and return the listing anyway.
    #[default]
    Report,
    /// Fail the listing with `DuplicateIdentity`.
    Fail,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Report => f.write_str("report"),
            DuplicatePolicy::Fail => f.write_str("fail"),
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "report" => Ok(DuplicatePolicy::Report),
            "fail" => Ok(DuplicatePolicy::Fail),
            other => Err(NoteError::Api(format!(
                "duplicate_ids must be `report` or `fail`, got `{}`",
                other
            ))),
        }
    }
}

/// Configuration for a notes root, stored in `<root>/.notedb/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteDbConfig {
    /// Size of the decode worker pool
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Result cap for searches that do not specify one
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Folder that bare note names are created in
    #[serde(default = "default_folder")]
    pub default_folder: String,

    #[serde(default)]
    pub duplicate_ids: DuplicatePolicy,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_folder() -> String {
    DEFAULT_FOLDER.to_string()
}

impl Default for NoteDbConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            search_limit: DEFAULT_SEARCH_LIMIT,
            default_folder: default_folder(),
            duplicate_ids: DuplicatePolicy::default(),
        }
    }
}

impl NoteDbConfig {
    pub const KEYS: [&'static str; 4] = [
        "workers",
        "search_limit",
        "default_folder",
        "duplicate_ids",
    ];

    pub fn config_dir(root: &Path) -> PathBuf {
        root.join(STORE_DIR)
    }

    /// Load config for the given notes root, or return defaults if not found
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self> {
        let config_path = Self::config_dir(root.as_ref()).join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NoteError::Io)?;
        let config: NoteDbConfig =
            serde_json::from_str(&content).map_err(NoteError::Serialization)?;
        Ok(config)
    }

    /// Save config under the given notes root
    pub fn save<P: AsRef<Path>>(&self, root: P) -> Result<()> {
        let config_dir = Self::config_dir(root.as_ref());

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).map_err(NoteError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(NoteError::Serialization)?;
        fs::write(config_path, content).map_err(NoteError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "workers" => Ok(self.workers.to_string()),
            "search_limit" => Ok(self.search_limit.to_string()),
            "default_folder" => Ok(self.default_folder.clone()),
            "duplicate_ids" => Ok(self.duplicate_ids.to_string()),
            other => Err(unknown_key(other)),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "workers" => self.workers = parse_positive(key, value)?,
            "search_limit" => self.search_limit = parse_positive(key, value)?,
            "default_folder" => {
                let folder = value.trim_matches('/');
                if folder.is_empty() {
                    return Err(NoteError::Api("default_folder cannot be empty".into()));
                }
                self.default_folder = folder.to_string();
            }
            "duplicate_ids" => self.duplicate_ids = value.parse()?,
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn parse_positive(key: &str, value: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(NoteError::Api(format!(
            "{} must be a positive integer, got `{}`",
            key, value
        ))),
    }
}

fn unknown_key(key: &str) -> NoteError {
    NoteError::Api(format!(
        "Unknown config key `{}` (expected one of: {})",
        key,
        NoteDbConfig::KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = NoteDbConfig::default();
        assert_eq!(config.workers, 10);
        assert_eq!(config.search_limit, 5);
        assert_eq!(config.default_folder, "unfiled");
        assert_eq!(config.duplicate_ids, DuplicatePolicy::Report);
    }

    #[test]
    fn test_load_missing_config() {
        let tmp = TempDir::new().unwrap();
        let config = NoteDbConfig::load(tmp.path()).unwrap();
        assert_eq!(config, NoteDbConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();

        let mut config = NoteDbConfig::default();
        config.set("workers", "3").unwrap();
        config.set("duplicate_ids", "fail").unwrap();
        config.save(tmp.path()).unwrap();

        assert!(tmp.path().join(".notedb/config.json").exists());
        let loaded = NoteDbConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded.workers, 3);
        assert_eq!(loaded.duplicate_ids, DuplicatePolicy::Fail);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".notedb")).unwrap();
        fs::write(tmp.path().join(".notedb/config.json"), r#"{"search_limit": 9}"#).unwrap();

        let loaded = NoteDbConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded.search_limit, 9);
        assert_eq!(loaded.workers, 10);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = NoteDbConfig::default();
        assert!(config.set("workers", "0").is_err());
        assert!(config.set("workers", "many").is_err());
        assert!(config.set("duplicate_ids", "sometimes").is_err());
        assert!(config.set("default_folder", "/").is_err());
        assert!(config.set("colour", "blue").is_err());
    }

    #[test]
    fn test_default_folder_is_trimmed() {
        let mut config = NoteDbConfig::default();
        config.set("default_folder", "/inbox/").unwrap();
        assert_eq!(config.get("default_folder").unwrap(), "inbox");
    }

    #[test]
    fn test_committed_config_cannot_choose_an_executable() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".notedb")).unwrap();
        fs::write(
            tmp.path().join(".notedb/config.json"),
            r#"{"workers": 2, "git_program": "sh"}"#,
        )
        .unwrap();

        let loaded = NoteDbConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded.workers, 2);
        assert!(!serde_json::to_string(&loaded).unwrap().contains("git_program"));

        let mut config = NoteDbConfig::default();
        assert!(config.set("git_program", "sh").is_err());
        assert!(config.get("git_program").is_err());
    }
}
