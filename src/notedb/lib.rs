//! # Notedb Architecture
//!
//! Notedb keeps personal notes as plain text files in a directory that is
//! also a git working copy. The library reads and writes those files and
//! drives git; the `notedb` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs, cli/)                               │
//! │  - Parses arguments, prints results, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Thin facade, normalizes ids and defaults                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)                                   │
//! │  - One operation per module, returns CmdResult              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                 ┌────────────┴────────────┐
//!                 ▼                         ▼
//! ┌───────────────────────────┐ ┌───────────────────────────────┐
//! │  store/ + scan + format   │ │  git                          │
//! │  files ↔ records          │ │  commit, push, pull, status   │
//! └───────────────────────────┘ └───────────────────────────────┘
//! ```
//!
//! ## Files are Truth
//!
//! There is no database. Each file under the root is one note. A note may
//! start with a small header (see [`format`]) holding its id, timestamps,
//! checksum and tags; files without one are still listed and searchable and
//! get a header the next time `doctor` or `sync` runs.
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments, returns
//! `Result<CmdResult>` and never writes to stdout or stderr. Diagnostics go
//! through the `log` facade; the binary decides where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade, entry point for all operations
//! - [`commands`]: one module per operation
//! - [`store`]: the record store (listing, lookup, search, tree, writes)
//! - [`scan`]: directory walk that finds candidate note files
//! - [`format`]: the on-disk header codec
//! - [`git`]: the sync controller
//! - [`model`]: `Record`, `Header`, `TreeNode`
//! - [`config`]: per-root configuration
//! - [`error`]: error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod git;
pub mod model;
pub mod scan;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
