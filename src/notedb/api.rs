//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for notedb operations, whatever the client.
//!
//! The facade:
//! - **Dispatches** to the matching `commands::*::run`
//! - **Normalizes inputs** (id strings → `Uuid`, optional limits → config
//!   defaults, "commit?" flags → an optional [`GitSync`])
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does not print, does not exit and holds no business logic. The store
//! and the git controller are rebuilt from the configuration whenever it
//! changes, so a `config` call takes effect for the next operation.

use crate::commands;
use crate::config::NoteDbConfig;
use crate::error::{NoteError, Result};
use crate::git::GitSync;
use crate::store::NoteStore;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::remote::RemoteAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

pub struct NoteDbApi {
    root: PathBuf,
    config: NoteDbConfig,
    store: NoteStore,
    git: GitSync,
}

impl NoteDbApi {
    /// Opens the notes root, reading `.notedb/config.json` when present.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = NoteDbConfig::load(&root)?;
        Ok(Self::with_config(root, config))
    }

    pub fn with_config(root: PathBuf, config: NoteDbConfig) -> Self {
        let store = NoteStore::from_config(root.clone(), &config);
        let git = GitSync::new(root.clone());
        Self {
            root,
            config,
            store,
            git,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &NoteDbConfig {
        &self.config
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn create_note(&self, path: &str, content: &str, commit: bool) -> Result<CmdResult> {
        commands::create::run(
            &self.store,
            self.committer(commit),
            &self.config.default_folder,
            path,
            content,
        )
    }

    pub fn edit_note(&self, id: &str, content: String, commit: bool) -> Result<CmdResult> {
        let id = parse_id(id)?;
        commands::edit::run(&self.store, self.committer(commit), &id, content)
    }

    pub fn view_note(&self, id: &str) -> Result<CmdResult> {
        commands::view::run(&self.store, &parse_id(id)?)
    }

    pub fn tree(&self, expanded: bool) -> Result<CmdResult> {
        commands::tree::run(&self.store, expanded)
    }

    pub fn search(&self, query: &str, limit: Option<usize>) -> Result<CmdResult> {
        let limit = limit.unwrap_or(self.config.search_limit);
        commands::search::run(&self.store, query, limit)
    }

    pub fn doctor(&self) -> Result<CmdResult> {
        commands::doctor::run(&self.store)
    }

    pub fn sync(&self) -> Result<CmdResult> {
        commands::sync::run(&self.store, &self.git)
    }

    pub fn status(&self) -> Result<CmdResult> {
        commands::status::run(&self.git)
    }

    pub fn remote(&self, action: RemoteAction) -> Result<CmdResult> {
        commands::remote::run(&self.git, action)
    }

    pub fn config_action(&mut self, action: ConfigAction) -> Result<CmdResult> {
        let result = commands::config::run(&self.root, action)?;
        if let Some(config) = &result.config {
            if *config != self.config {
                *self = Self::with_config(self.root.clone(), config.clone());
            }
        }
        Ok(result)
    }

    fn committer(&self, commit: bool) -> Option<&GitSync> {
        commit.then_some(&self.git)
    }
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| NoteError::Api(format!("Invalid note id: {}", raw)))
}
