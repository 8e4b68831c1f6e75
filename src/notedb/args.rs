use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string with the git hash and commit date when the
/// build had them. Format: "0.3.2" or "0.3.2@abc1234 2026-01-15".
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("NOTEDB_GIT_HASH");
    const COMMIT_DATE: &str = env!("NOTEDB_COMMIT_DATE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "notedb", bin_name = "notedb", version = get_version())]
#[command(about = "Plain text notes in a git repository", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Notes root (defaults to the current directory)
    #[arg(long, global = true, env = "NOTEDB_ROOT")]
    pub root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the notes as a folder tree
    #[command(alias = "ls")]
    Tree {
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,

        /// Mark every folder as expanded
        #[arg(long)]
        expanded: bool,
    },

    /// Search note names, then contents
    Search {
        query: String,

        /// Maximum number of results (defaults to the `search_limit` config)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print a note by id
    #[command(alias = "v")]
    View { id: String },

    /// Create a note (bare names go under the default folder)
    #[command(alias = "n")]
    New {
        /// Path relative to the notes root
        path: String,

        /// Content (read from stdin if omitted)
        content: Option<String>,

        /// Do not commit after writing
        #[arg(long)]
        no_commit: bool,
    },

    /// Replace the content of a note
    #[command(alias = "e")]
    Edit {
        id: String,

        /// New content (read from stdin if omitted)
        content: Option<String>,

        /// Do not commit after writing
        #[arg(long)]
        no_commit: bool,
    },

    /// Add missing headers and check for duplicate ids
    Doctor,

    /// Doctor, commit everything and push
    Sync,

    /// Fetch, then show last commit, last fetch and divergence
    Status,

    /// Push to the upstream branch
    Push,

    /// Pull from the upstream branch
    Pull,

    /// Fetch from the remote
    Fetch,

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., search_limit)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
