use crate::config::NoteDbConfig;
use crate::git::SyncStatus;
use crate::model::{Record, TreeNode};

pub mod config;
pub mod create;
pub mod doctor;
pub mod edit;
pub mod remote;
pub mod search;
pub mod status;
pub mod sync;
pub mod tree;
pub mod view;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_records: Vec<Record>,
    pub listed_records: Vec<Record>,
    pub tree: Vec<TreeNode>,
    pub status: Option<SyncStatus>,
    pub config: Option<NoteDbConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_records(mut self, records: Vec<Record>) -> Self {
        self.affected_records = records;
        self
    }

    pub fn with_listed_records(mut self, records: Vec<Record>) -> Self {
        self.listed_records = records;
        self
    }

    pub fn with_tree(mut self, tree: Vec<TreeNode>) -> Self {
        self.tree = tree;
        self
    }

    pub fn with_status(mut self, status: SyncStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_config(mut self, config: NoteDbConfig) -> Self {
        self.config = Some(config);
        self
    }
}
