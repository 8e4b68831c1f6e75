//! Consistency pass over the whole root.
//!
//! 1. Every header-less file gets a fresh header.
//! 2. No two files may share an id. This is checked before anything is
//!    written and always fails hard, whatever the listing policy is.
//! 3. Files that received a header are written back.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Record;
use crate::store::{check_duplicates, NoteStore};

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub scanned: usize,
    pub headers_added: Vec<Record>,
}

pub fn repair(store: &NoteStore) -> Result<DoctorReport> {
    let mut records = store.all_records()?;

    let needs_header: Vec<usize> = records
        .iter_mut()
        .enumerate()
        .filter_map(|(i, record)| record.ensure_header().then_some(i))
        .collect();

    check_duplicates(&records)?;

    let mut headers_added = Vec::with_capacity(needs_header.len());
    for i in needs_header {
        let record = &mut records[i];
        log::info!("adding header to {}", record.path.display());
        store.save(record)?;
        headers_added.push(record.clone());
    }

    Ok(DoctorReport {
        scanned: records.len(),
        headers_added,
    })
}

pub fn run(store: &NoteStore) -> Result<CmdResult> {
    let report = repair(store)?;
    let mut result = CmdResult::default();

    if report.headers_added.is_empty() {
        result.add_message(CmdMessage::success(format!(
            "Checked {} note(s), no problems found.",
            report.scanned
        )));
    } else {
        result.add_message(CmdMessage::warning(format!(
            "Added headers to {} note(s):",
            report.headers_added.len()
        )));
        for record in &report.headers_added {
            result.add_message(CmdMessage::info(format!("  - {}", record.path.display())));
        }
    }

    Ok(result.with_affected_records(report.headers_added))
}
