use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Revision of the on-disk header grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatVersion {
    V1,
}

impl FormatVersion {
    pub const CURRENT: FormatVersion = FormatVersion::V1;

    pub fn number(self) -> u32 {
        match self {
            FormatVersion::V1 => 1,
        }
    }

    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(FormatVersion::V1),
            _ => None,
        }
    }
}

/// Current time truncated to whole seconds, the precision the header stores.
pub fn now_seconds() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub version: FormatVersion,
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl Header {
    pub fn new() -> Self {
        let now = now_seconds();
        Self {
            version: FormatVersion::CURRENT,
            id: Uuid::new_v4(),
            created_at: now,
            modified_at: Some(now),
            tags: Vec::new(),
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

/// A decoded note. The file at `path` is the durable entity; this is a
/// projection of it that lives as long as the caller holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub header: Option<Header>,
    pub path: PathBuf,
    pub content: String,
}

impl Record {
    /// A fresh record with a new id and the current timestamp.
    pub fn new(path: PathBuf, content: String) -> Self {
        Self {
            header: Some(Header::new()),
            path,
            content,
        }
    }

    /// A legacy record with no header and therefore no identity.
    pub fn headerless(path: PathBuf, content: String) -> Self {
        Self {
            header: None,
            path,
            content,
        }
    }

    pub fn has_header(&self) -> bool {
        self.header.is_some()
    }

    pub fn id(&self) -> Option<Uuid> {
        self.header.as_ref().map(|h| h.id)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.header.as_ref().map(|h| h.created_at)
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.header.as_ref().and_then(|h| h.modified_at)
    }

    /// Final path segment, used for name matching and display.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Gives a header-less record an identity. Returns `true` if one was added.
    pub fn ensure_header(&mut self) -> bool {
        if self.header.is_some() {
            return false;
        }
        self.header = Some(Header::new());
        true
    }

    pub fn update(&mut self, content: String) {
        self.content = content;
        self.touch();
    }

    /// Stamps the modification time. No-op for header-less records.
    pub fn touch(&mut self) {
        if let Some(header) = self.header.as_mut() {
            header.modified_at = Some(now_seconds());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    File,
    Collapsed,
    Expanded,
}

/// One path segment of the directory-shaped view over the record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub state: NodeState,
    pub contents: Vec<TreeNode>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<Uuid>,
}

impl TreeNode {
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: NodeState::Collapsed,
            contents: Vec::new(),
            id: None,
        }
    }

    pub fn is_file(&self) -> bool {
        self.state == NodeState::File
    }

    /// Marks every directory below and including this node as expanded.
    pub fn expand_all(&mut self) {
        if self.state == NodeState::Collapsed {
            self.state = NodeState::Expanded;
        }
        for child in &mut self.contents {
            child.expand_all();
        }
    }
}
