//! # Git Sync
//!
//! [`GitSync`] drives the `git` executable for a notes root. Every call runs
//! the child process with the root as its working directory; the process
//! cwd is never touched, so controllers for different roots can be used side
//! by side.
//!
//! Nothing here retries. A non-zero exit becomes
//! [`NoteError::ExternalTool`] carrying the captured output so callers can
//! show the user what git said. A clean working tree is not an error:
//! [`GitSync::commit`] just reports that nothing was committed.
//!
//! There are no timeouts: a git process that hangs (for example waiting on
//! credentials) hangs the caller too.

use crate::error::{NoteError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

const DIVERGENCE_ARGS: [&str; 4] = ["rev-list", "--left-right", "--count", "@{upstream}...HEAD"];

/// Commits each side has that the other lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Divergence {
    pub remote_ahead_by: u32,
    pub local_ahead_by: u32,
}

/// Snapshot of the repository's sync state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub last_commit: DateTime<Utc>,
    pub last_fetch: DateTime<Utc>,
    pub divergence: Divergence,
}

#[derive(Debug, Clone)]
pub struct GitSync {
    root: PathBuf,
    program: OsString,
}

impl GitSync {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            program: OsString::from("git"),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stages everything and commits it. Returns `false` when the tree was
    /// already clean.
    pub fn commit(&self, message: &str) -> Result<bool> {
        self.run(&["add", "-A"])?;
        let status = self.run(&["status", "--porcelain"])?;
        if status.trim().is_empty() {
            log::info!("nothing to commit in {}", self.root.display());
            return Ok(false);
        }
        self.run(&["commit", "-m", message])?;
        log::info!("committed {:?}", message);
        Ok(true)
    }

    pub fn push(&self) -> Result<()> {
        self.run(&["push"]).map(drop)
    }

    pub fn pull(&self) -> Result<()> {
        self.run(&["pull"]).map(drop)
    }

    pub fn fetch(&self) -> Result<()> {
        self.run(&["fetch"]).map(drop)
    }

    pub fn last_commit_timestamp(&self) -> Result<DateTime<Utc>> {
        let output = self.run(&["log", "-1", "--format=%ct"])?;
        parse_epoch("log -1 --format=%ct", &output)
    }

    /// Modification time of `FETCH_HEAD`, i.e. when a fetch or pull last ran.
    pub fn last_fetch_timestamp(&self) -> Result<DateTime<Utc>> {
        let raw = self.run(&["rev-parse", "--git-path", "FETCH_HEAD"])?;
        let fetch_head = self.root.join(raw.trim());
        match fs::metadata(&fetch_head) {
            Ok(meta) => Ok(meta.modified()?.into()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(NoteError::NeverFetched),
            Err(e) => Err(NoteError::in_file(fetch_head, e.into())),
        }
    }

    pub fn divergence_from_upstream(&self) -> Result<Divergence> {
        let output = self.run(&DIVERGENCE_ARGS)?;
        parse_divergence(&output)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let command = args.join(" ");
        log::debug!("git {} (in {})", command, self.root.display());

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.root)
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let mut captured = stdout;
            captured.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(NoteError::ExternalTool {
                command,
                status: output.status.to_string(),
                output: captured.trim_end().to_string(),
            });
        }
        Ok(stdout)
    }
}

/// Parses `rev-list --left-right --count` output: upstream count, then local.
pub fn parse_divergence(output: &str) -> Result<Divergence> {
    let counts: Vec<u32> = output
        .split_whitespace()
        .map(str::parse::<u32>)
        .collect::<std::result::Result<Vec<u32>, _>>()
        .map_err(|_| format_error(DIVERGENCE_ARGS.join(" "), output))?;

    match counts.as_slice() {
        [remote, local] => Ok(Divergence {
            remote_ahead_by: *remote,
            local_ahead_by: *local,
        }),
        _ => Err(format_error(DIVERGENCE_ARGS.join(" "), output)),
    }
}

fn parse_epoch(command: &str, output: &str) -> Result<DateTime<Utc>> {
    output
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| format_error(command.to_string(), output))
}

fn format_error(command: String, output: &str) -> NoteError {
    NoteError::ToolOutput {
        command,
        output: output.to_string(),
    }
}
