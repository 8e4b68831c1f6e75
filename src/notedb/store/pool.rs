//! Bounded parallel decode of a list of note files.
//!
//! Workers pull the next index from a shared counter and hand each decoded
//! record to the collector over a rendezvous channel. The collector stops
//! the pool once it holds one result per input or sees the first error:
//! it raises the stop flag and drops its receiver, which wakes any worker
//! blocked in `send`. `thread::scope` joins every worker before returning.
//!
//! Files that are not UTF-8 text (images, `.DS_Store`, legacy encodings)
//! are not notes. They are skipped with a warning rather than failing the
//! listing.

use crate::error::{NoteError, Result};
use crate::format;
use crate::model::Record;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, SyncSender};
use std::thread;

/// Reads and decodes a single file, tagging failures with its path.
/// `Ok(None)` means the file is not text and was skipped.
pub fn read_record(path: &Path) -> Result<Option<Record>> {
    let bytes = fs::read(path).map_err(|e| NoteError::in_file(path, e.into()))?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::warn!(
                "skipping {}: not UTF-8 text ({})",
                path.display(),
                e.utf8_error()
            );
            return Ok(None);
        }
    };
    format::decode(path, &text)
        .map(Some)
        .map_err(|e| NoteError::in_file(path, e))
}

/// Decodes every path with at most `workers` threads. All-or-nothing: the
/// first failure is returned and no partial listing escapes.
pub fn decode_all(paths: &[PathBuf], workers: usize) -> Result<Vec<Record>> {
    decode_with(paths, workers, read_record)
}

fn decode_with<F>(paths: &[PathBuf], workers: usize, decode: F) -> Result<Vec<Record>>
where
    F: Fn(&Path) -> Result<Option<Record>> + Sync,
{
    if paths.is_empty() {
        return Ok(Vec::new());
    }
    let workers = workers.clamp(1, paths.len());

    let next = AtomicUsize::new(0);
    let stop = AtomicBool::new(false);
    let (tx, rx) = mpsc::sync_channel::<Result<Option<Record>>>(0);

    thread::scope(|s| {
        for _ in 0..workers {
            let tx = tx.clone();
            let (next, stop, decode) = (&next, &stop, &decode);
            s.spawn(move || work(paths, next, stop, decode, tx));
        }
        drop(tx);

        let mut received = 0;
        let mut records = Vec::with_capacity(paths.len());
        let outcome = loop {
            if received == paths.len() {
                break Ok(records);
            }
            match rx.recv() {
                Ok(Ok(record)) => {
                    received += 1;
                    records.extend(record);
                }
                Ok(Err(e)) => break Err(e),
                Err(_) => {
                    break Err(NoteError::Store(
                        "decode workers exited before all files were read".into(),
                    ))
                }
            }
        };

        stop.store(true, Ordering::SeqCst);
        drop(rx);
        outcome
    })
}

fn work<F>(
    paths: &[PathBuf],
    next: &AtomicUsize,
    stop: &AtomicBool,
    decode: &F,
    results: SyncSender<Result<Option<Record>>>,
) where
    F: Fn(&Path) -> Result<Option<Record>>,
{
    while !stop.load(Ordering::SeqCst) {
        let i = next.fetch_add(1, Ordering::SeqCst);
        let Some(path) = paths.get(i) else {
            return;
        };
        if results.send(decode(path)).is_err() {
            return;
        }
    }
}
