//! # Record Format
//!
//! Each note is a plain text file. Notes written by notedb carry a header
//! block in front of the content:
//!
//! ```text
//! --BEGIN HEADER--
//! Version: 1
//! ID: 430bf597-74ac-40ad-9453-edcc353bc026
//! CreationTS: 1513066695
//! ModifiedTS: 1513066711
//! MD5: f75b8179e4bbe7e2b4a074dcef62de95
//! Tags: work,ideas
//! --END HEADER--
//! content
//! ```
//!
//! `Version`, `ID` and `CreationTS` are required. `ModifiedTS`, `MD5` and
//! `Tags` are optional but, when present, must appear in this order and at
//! most once. The header boundary is found by line position alone, so the
//! content may itself contain sentinel-looking lines.
//!
//! Files that do not start with the begin sentinel are legacy notes: the
//! whole file is content and the record has no identity.

use crate::error::{NoteError, Result};
use crate::model::{FormatVersion, Header, Record};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

pub const HEADER_START: &str = "--BEGIN HEADER--";
pub const HEADER_END: &str = "--END HEADER--";

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Version: ([0-9]+)$").expect("valid regex"));
static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ID: (\S+)$").expect("valid regex"));
static CREATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^CreationTS: ([0-9]+)$").expect("valid regex"));
static MODIFIED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ModifiedTS: ([0-9]+)$").expect("valid regex"));
static MD5_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^MD5: ([0-9a-f]{32})$").expect("valid regex"));
static TAGS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Tags: (.*)$").expect("valid regex"));

/// A header line, named for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Begin,
    Version,
    Id,
    CreationTs,
    ModifiedTs,
    Md5,
    Tags,
    End,
}

impl HeaderField {
    const OPTIONAL: [HeaderField; 3] = [
        HeaderField::ModifiedTs,
        HeaderField::Md5,
        HeaderField::Tags,
    ];

    fn label(self) -> &'static str {
        match self {
            HeaderField::Begin => HEADER_START,
            HeaderField::Version => "Version",
            HeaderField::Id => "ID",
            HeaderField::CreationTs => "CreationTS",
            HeaderField::ModifiedTs => "ModifiedTS",
            HeaderField::Md5 => "MD5",
            HeaderField::Tags => "Tags",
            HeaderField::End => HEADER_END,
        }
    }

    fn pattern(self) -> Option<&'static Regex> {
        match self {
            HeaderField::Begin => None,
            HeaderField::Version => Some(&*VERSION_RE),
            HeaderField::Id => Some(&*ID_RE),
            HeaderField::CreationTs => Some(&*CREATION_RE),
            HeaderField::ModifiedTs => Some(&*MODIFIED_RE),
            HeaderField::Md5 => Some(&*MD5_RE),
            HeaderField::Tags => Some(&*TAGS_RE),
            HeaderField::End => None,
        }
    }

    /// Identifies a field line by its `Label:` prefix.
    fn from_line(line: &str) -> Option<HeaderField> {
        let (label, _) = line.split_once(':')?;
        [
            HeaderField::Version,
            HeaderField::Id,
            HeaderField::CreationTs,
            HeaderField::ModifiedTs,
            HeaderField::Md5,
            HeaderField::Tags,
        ]
        .into_iter()
        .find(|f| f.label() == label)
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hex MD5 of the content, as stored in the `MD5` field.
pub fn content_digest(content: &str) -> String {
    format!("{:x}", md5::compute(content.as_bytes()))
}

/// Serializes a record to its on-disk form.
pub fn encode(record: &Record) -> String {
    match &record.header {
        Some(header) => {
            let mut out = encode_header(header, &record.content);
            out.push_str(&record.content);
            out
        }
        None => record.content.clone(),
    }
}

fn encode_header(header: &Header, content: &str) -> String {
    let mut lines = vec![
        HEADER_START.to_string(),
        format!("Version: {}", header.version.number()),
        format!("ID: {}", header.id),
        format!("CreationTS: {}", header.created_at.timestamp()),
    ];
    if let Some(modified) = header.modified_at {
        lines.push(format!("ModifiedTS: {}", modified.timestamp()));
    }
    lines.push(format!("MD5: {}", content_digest(content)));
    if !header.tags.is_empty() {
        lines.push(format!("Tags: {}", header.tags.join(",")));
    }
    lines.push(HEADER_END.to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Parses the on-disk form of the file at `path`.
pub fn decode(path: impl Into<PathBuf>, text: &str) -> Result<Record> {
    let path = path.into();
    let first_line = text.split_once('\n').map_or(text, |(line, _)| line);
    if first_line != HEADER_START {
        // Headered note checked out with CRLF endings; never a legacy file.
        if first_line.trim_end_matches('\r') == HEADER_START {
            return Err(malformed(HeaderField::Begin, "header uses CRLF line endings"));
        }
        return Ok(Record::headerless(path, text.to_string()));
    }

    let mut lines = LineCursor { rest: text };
    lines.next_line();

    let version = parse_version(lines.required(HeaderField::Version)?)?;
    let id_raw = lines.required(HeaderField::Id)?;
    let id = Uuid::parse_str(id_raw)
        .map_err(|e| malformed(HeaderField::Id, format!("{:?} is not a UUID: {}", id_raw, e)))?;
    let created_at = parse_timestamp(
        lines.required(HeaderField::CreationTs)?,
        HeaderField::CreationTs,
    )?;

    let mut modified_at = None;
    let mut digest = None;
    let mut tags = Vec::new();
    let mut next_optional = 0;

    loop {
        let line = lines
            .next_line()
            .ok_or_else(|| malformed(HeaderField::End, "input ends inside the header"))?;
        if line == HEADER_END {
            break;
        }

        let field = HeaderField::from_line(line).ok_or_else(|| {
            malformed(
                HeaderField::End,
                format!("expected `{}`, found {:?}", HEADER_END, line),
            )
        })?;
        match HeaderField::OPTIONAL.iter().position(|f| *f == field) {
            Some(pos) if pos >= next_optional => next_optional = pos + 1,
            _ => return Err(malformed(field, "duplicate or out of order")),
        }

        let value = capture(line, field)?;
        match field {
            HeaderField::ModifiedTs => modified_at = Some(parse_timestamp(value, field)?),
            HeaderField::Md5 => digest = Some(value.to_string()),
            HeaderField::Tags => {
                tags = value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            }
            _ => {}
        }
    }

    let content = lines.rest;
    if let Some(expected) = digest {
        let actual = content_digest(content);
        if expected != actual {
            return Err(NoteError::IntegrityMismatch { expected, actual });
        }
    }

    Ok(Record {
        header: Some(Header {
            version,
            id,
            created_at,
            modified_at,
            tags,
        }),
        path,
        content: content.to_string(),
    })
}

struct LineCursor<'a> {
    rest: &'a str,
}

impl<'a> LineCursor<'a> {
    fn next_line(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        match self.rest.split_once('\n') {
            Some((line, rest)) => {
                self.rest = rest;
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }

    fn required(&mut self, field: HeaderField) -> Result<&'a str> {
        let line = self
            .next_line()
            .ok_or_else(|| malformed(field, "missing"))?;
        capture(line, field)
    }
}

fn capture(line: &str, field: HeaderField) -> Result<&str> {
    field
        .pattern()
        .and_then(|re| re.captures(line))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| malformed(field, format!("unexpected line {:?}", line)))
}

fn parse_version(raw: &str) -> Result<FormatVersion> {
    let number: u32 = raw
        .parse()
        .map_err(|_| malformed(HeaderField::Version, format!("{} is out of range", raw)))?;
    FormatVersion::from_number(number).ok_or_else(|| {
        malformed(
            HeaderField::Version,
            format!("unsupported version {}", number),
        )
    })
}

fn parse_timestamp(raw: &str, field: HeaderField) -> Result<DateTime<Utc>> {
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| malformed(field, format!("{} is not a valid unix timestamp", raw)))
}

fn malformed(field: HeaderField, reason: impl Into<String>) -> NoteError {
    NoteError::MalformedHeader {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_HEADER: &str = "--BEGIN HEADER--\n\
        Version: 1\n\
        ID: 430bf597-74ac-40ad-9453-edcc353bc026\n\
        CreationTS: 1513066695\n\
        --END HEADER--";

    fn sample_record() -> Record {
        let mut record = Record::new(PathBuf::from("/notes/todo.txt"), "buy milk\n".into());
        if let Some(header) = record.header.as_mut() {
            header.tags = vec!["home".into(), "errands".into()];
        }
        record
    }

    fn field_of(err: &NoteError) -> HeaderField {
        match err {
            NoteError::MalformedHeader { field, .. } => *field,
            other => panic!("expected MalformedHeader, got {:?}", other),
        }
    }

    #[test]
    fn crlf_header_is_malformed_not_legacy() {
        let record = Record::new(PathBuf::from("/n/a.txt"), "line\n".to_string());
        let crlf = encode(&record).replace('\n', "\r\n");

        let err = decode("/n/a.txt", &crlf).unwrap_err();
        assert_eq!(field_of(&err), HeaderField::Begin);
    }

    #[test]
    fn decodes_minimal_header() {
        let text = format!("{}\ncontent\n", MINIMAL_HEADER);
        let record = decode("/notes/a.txt", &text).unwrap();
        let header = record.header.unwrap();

        assert_eq!(header.version, FormatVersion::V1);
        assert_eq!(
            header.id,
            Uuid::parse_str("430bf597-74ac-40ad-9453-edcc353bc026").unwrap()
        );
        assert_eq!(header.created_at.timestamp(), 1513066695);
        assert!(header.modified_at.is_none());
        assert!(header.tags.is_empty());
        assert_eq!(record.content, "content\n");
    }

    #[test]
    fn round_trip_preserves_record() {
        let record = sample_record();
        let decoded = decode(record.path.clone(), &encode(&record)).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn encoding_is_deterministic() {
        let record = sample_record();
        assert_eq!(encode(&record), encode(&record.clone()));
    }

    #[test]
    fn encoded_header_field_order() {
        let record = sample_record();
        let text = encode(&record);
        let labels: Vec<&str> = text
            .lines()
            .take(8)
            .map(|l| l.split(':').next().unwrap())
            .collect();
        assert_eq!(
            labels,
            vec![
                HEADER_START,
                "Version",
                "ID",
                "CreationTS",
                "ModifiedTS",
                "MD5",
                "Tags",
                HEADER_END
            ]
        );
    }

    #[test]
    fn empty_content_round_trips() {
        let record = Record::new(PathBuf::from("/notes/empty"), String::new());
        let text = encode(&record);
        assert!(text.ends_with(&format!("{}\n", HEADER_END)));
        assert_eq!(decode("/notes/empty", &text).unwrap().content, "");
    }

    #[test]
    fn content_may_contain_sentinels() {
        let content = format!("{}\nVersion: 7\n{}\n", HEADER_START, HEADER_END);
        let record = Record::new(PathBuf::from("/notes/meta.txt"), content.clone());
        let decoded = decode("/notes/meta.txt", &encode(&record)).unwrap();
        assert_eq!(decoded.content, content);
        assert_eq!(decoded.id(), record.id());
    }

    #[test]
    fn edited_content_fails_integrity_check() {
        let record = sample_record();
        let tampered = encode(&record).replace("buy milk", "buy beer");
        let err = decode("/notes/todo.txt", &tampered).unwrap_err();
        assert!(matches!(err, NoteError::IntegrityMismatch { .. }));
    }

    #[test]
    fn trailing_bytes_on_end_sentinel_are_rejected() {
        let text = format!("{}trailing on last line content\n", MINIMAL_HEADER);
        let err = decode("/notes/a.txt", &text).unwrap_err();
        assert_eq!(field_of(&err), HeaderField::End);
    }

    #[test]
    fn headerless_file_is_all_content() {
        let text = "just some notes\n--BEGIN HEADER--\n";
        let record = decode("/notes/legacy.txt", text).unwrap();
        assert!(record.header.is_none());
        assert_eq!(record.content, text);
    }

    #[test]
    fn sentinel_prefix_without_line_break_is_headerless() {
        let record = decode("/notes/x", "--BEGIN HEADER--and more").unwrap();
        assert!(!record.has_header());
    }

    #[test]
    fn empty_file_is_headerless() {
        let record = decode("/notes/x", "").unwrap();
        assert!(!record.has_header());
        assert_eq!(record.content, "");
    }

    #[test]
    fn missing_required_field_names_it() {
        let text = "--BEGIN HEADER--\nVersion: 1\nCreationTS: 1\n--END HEADER--\n";
        let err = decode("/notes/x", text).unwrap_err();
        assert_eq!(field_of(&err), HeaderField::Id);
    }

    #[test]
    fn truncated_header_is_rejected() {
        let err = decode("/notes/x", "--BEGIN HEADER--\nVersion: 1\n").unwrap_err();
        assert_eq!(field_of(&err), HeaderField::Id);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let text = MINIMAL_HEADER.replace("Version: 1", "Version: 2");
        let err = decode("/notes/x", &text).unwrap_err();
        assert_eq!(field_of(&err), HeaderField::Version);
    }

    #[test]
    fn invalid_uuid_is_rejected() {
        let text = MINIMAL_HEADER.replace("430bf597-74ac", "not-a-uuid");
        let err = decode("/notes/x", &text).unwrap_err();
        assert_eq!(field_of(&err), HeaderField::Id);
    }

    #[test]
    fn out_of_order_optional_fields_are_rejected() {
        let text = "--BEGIN HEADER--\n\
            Version: 1\n\
            ID: 430bf597-74ac-40ad-9453-edcc353bc026\n\
            CreationTS: 1513066695\n\
            Tags: a\n\
            ModifiedTS: 1513066711\n\
            --END HEADER--\n";
        let err = decode("/notes/x", text).unwrap_err();
        assert_eq!(field_of(&err), HeaderField::ModifiedTs);
    }

    #[test]
    fn repeated_required_field_is_rejected() {
        let text = MINIMAL_HEADER.replace(
            "--END HEADER--",
            "CreationTS: 1513066695\n--END HEADER--",
        );
        let err = decode("/notes/x", &text).unwrap_err();
        assert_eq!(field_of(&err), HeaderField::CreationTs);
    }

    #[test]
    fn uppercase_digest_is_malformed() {
        let text = MINIMAL_HEADER.replace(
            "--END HEADER--",
            "MD5: F75B8179E4BBE7E2B4A074DCEF62DE95\n--END HEADER--",
        );
        let err = decode("/notes/x", &text).unwrap_err();
        assert_eq!(field_of(&err), HeaderField::Md5);
    }

    #[test]
    fn headerless_record_encodes_to_content() {
        let record = Record::headerless(PathBuf::from("/n"), "plain".into());
        assert_eq!(encode(&record), "plain");
    }
}
