//! # CLI Behavior
//!
//! One client of the notedb library. This is the only place that touches
//! the terminal: it reads stdin, prints results and sets the exit code.
//!
//! ## Root Resolution
//!
//! `--root`, then `NOTEDB_ROOT`, then the current directory.
//!
//! ## Content Input
//!
//! `new` and `edit` take content as a trailing argument. When it is
//! omitted the content is read from stdin, so
//! `echo "buy milk" | notedb new todo.txt` works.
//!
//! ## Committing
//!
//! `new` and `edit` commit the root after writing. `--no-commit` skips
//! that, which is also how the binary is used outside a git repository.

mod print;

use crate::args::{Cli, Commands};
use notedb::api::{ConfigAction, NoteDbApi, RemoteAction};
use notedb::error::Result;
use std::io;
use std::path::PathBuf;

use print::{
    print_full_records, print_messages, print_records, print_status, print_tree, print_tree_json,
};

pub fn run(cli: Cli) -> Result<()> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    log::debug!("notes root: {}", root.display());
    let mut api = NoteDbApi::open(root)?;

    match cli.command {
        Commands::Tree { json, expanded } => handle_tree(&api, json, expanded),
        Commands::Search { query, limit } => handle_search(&api, &query, limit),
        Commands::View { id } => handle_view(&api, &id),
        Commands::New {
            path,
            content,
            no_commit,
        } => handle_new(&api, &path, content, !no_commit),
        Commands::Edit {
            id,
            content,
            no_commit,
        } => handle_edit(&api, &id, content, !no_commit),
        Commands::Doctor => report(api.doctor()?),
        Commands::Sync => report(api.sync()?),
        Commands::Status => handle_status(&api),
        Commands::Push => report(api.remote(RemoteAction::Push)?),
        Commands::Pull => report(api.remote(RemoteAction::Pull)?),
        Commands::Fetch => report(api.remote(RemoteAction::Fetch)?),
        Commands::Config { key, value } => handle_config(&mut api, key, value),
    }
}

fn handle_tree(api: &NoteDbApi, json: bool, expanded: bool) -> Result<()> {
    let result = api.tree(expanded)?;
    if json {
        return print_tree_json(&result.tree);
    }
    print_tree(&result.tree);
    print_messages(&result.messages);
    Ok(())
}

fn handle_search(api: &NoteDbApi, query: &str, limit: Option<usize>) -> Result<()> {
    let result = api.search(query, limit)?;
    print_records(api.root(), &result.listed_records);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(api: &NoteDbApi, id: &str) -> Result<()> {
    let result = api.view_note(id)?;
    print_full_records(api.root(), &result.listed_records);
    Ok(())
}

fn handle_new(api: &NoteDbApi, path: &str, content: Option<String>, commit: bool) -> Result<()> {
    let content = content_or_stdin(content)?;
    let result = api.create_note(path, &content, commit)?;
    print_records(api.root(), &result.affected_records);
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(api: &NoteDbApi, id: &str, content: Option<String>, commit: bool) -> Result<()> {
    let content = content_or_stdin(content)?;
    report(api.edit_note(id, content, commit)?)
}

fn handle_status(api: &NoteDbApi) -> Result<()> {
    let result = api.status()?;
    if let Some(status) = &result.status {
        print_status(status);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(api: &mut NoteDbApi, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    report(api.config_action(action)?)
}

fn report(result: notedb::api::CmdResult) -> Result<()> {
    print_messages(&result.messages);
    Ok(())
}

fn content_or_stdin(content: Option<String>) -> Result<String> {
    match content {
        Some(c) => Ok(c),
        None => Ok(io::read_to_string(io::stdin())?),
    }
}
