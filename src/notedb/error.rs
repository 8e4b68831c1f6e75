use crate::format::HeaderField;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum NoteError {
    #[error("Record not found: {0}")]
    NotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed header ({field}): {reason}")]
    MalformedHeader { field: HeaderField, reason: String },

    #[error("Integrity mismatch: header records MD5 {expected}, content hashes to {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<NoteError>,
    },

    #[error("Duplicate id {id} in {} and {}", first.display(), second.display())]
    DuplicateIdentity {
        id: Uuid,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("`git {command}` failed ({status}):\n{output}")]
    ExternalTool {
        command: String,
        status: String,
        output: String,
    },

    #[error("Unexpected output from `git {command}`: {output:?}")]
    ToolOutput { command: String, output: String },

    #[error("Repository has never been fetched")]
    NeverFetched,

    #[error("Invalid note path: {0}")]
    InvalidPath(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl NoteError {
    pub(crate) fn in_file(path: impl Into<PathBuf>, source: NoteError) -> Self {
        NoteError::InFile {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// The error with any file context stripped.
    pub fn root_cause(&self) -> &NoteError {
        match self {
            NoteError::InFile { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, NoteError>;
