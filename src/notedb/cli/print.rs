use chrono::{DateTime, Utc};
use colored::Colorize;
use notedb::api::{CmdMessage, MessageLevel};
use notedb::error::Result;
use notedb::git::SyncStatus;
use notedb::model::{Record, TreeNode};
use std::path::Path;
use timeago::Formatter;

const INDENT: &str = "  ";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub(super) fn print_full_records(root: &Path, records: &[Record]) {
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!(
            "{} {}",
            display_id(record).yellow(),
            relative(root, &record.path).bold()
        );
        if let Some(header) = &record.header {
            if !header.tags.is_empty() {
                println!("{}", header.tags.join(", ").cyan());
            }
        }
        println!("--------------------------------");
        print!("{}", record.content);
        if !record.content.ends_with('\n') {
            println!();
        }
    }
}

pub(super) fn print_records(root: &Path, records: &[Record]) {
    for record in records {
        let when = record
            .created_at()
            .map(format_time_ago)
            .unwrap_or_else(|| "no header".to_string());
        println!(
            "{}{}  {}  {}",
            INDENT,
            display_id(record).yellow(),
            relative(root, &record.path),
            when.dimmed()
        );
    }
}

pub(super) fn print_tree(nodes: &[TreeNode]) {
    print_tree_level(nodes, 0);
}

fn print_tree_level(nodes: &[TreeNode], depth: usize) {
    for node in nodes {
        let pad = INDENT.repeat(depth);
        if node.is_file() {
            println!("{}{}", pad, node.name);
        } else {
            println!("{}{}", pad, format!("{}/", node.name).blue().bold());
            print_tree_level(&node.contents, depth + 1);
        }
    }
}

pub(super) fn print_tree_json(nodes: &[TreeNode]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(nodes)?);
    Ok(())
}

pub(super) fn print_status(status: &SyncStatus) {
    println!(
        "Last commit: {}",
        format_time_ago(status.last_commit).bold()
    );
    println!("Last fetch:  {}", format_time_ago(status.last_fetch).bold());

    let d = status.divergence;
    let summary = match (d.remote_ahead_by, d.local_ahead_by) {
        (0, 0) => "Up to date with upstream.".green(),
        (r, 0) => format!("Behind upstream by {} commit(s).", r).yellow(),
        (0, l) => format!("Ahead of upstream by {} commit(s).", l).yellow(),
        (r, l) => format!("Diverged: {} behind, {} ahead.", r, l).red(),
    };
    println!("{}", summary);
}

fn display_id(record: &Record) -> String {
    record
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".repeat(36))
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}
