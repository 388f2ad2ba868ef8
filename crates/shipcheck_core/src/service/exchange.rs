//! File exchange formats for sharing checklists and contacts.
//!
//! # Responsibility
//! - Encode/decode `.shipchecklist` (one custom checklist) and
//!   `.shipcontacts` (the whole contact directory) documents.
//!
//! # Invariants
//! - Imported checklists always receive a fresh id so they never collide
//!   with the sender's copy (or an earlier import of the same file).
//! - Imported documents are validated before they are returned.
//! - Unlike the key-value stores, exchange failures are returned to the
//!   caller, which shows them to the user.

use crate::model::checklist::{CustomChecklist, ValidationError};
use crate::model::contact::ContactCategory;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub const CHECKLIST_FILE_EXTENSION: &str = "shipchecklist";
pub const CONTACTS_FILE_EXTENSION: &str = "shipcontacts";

const FALLBACK_FILE_STEM: &str = "Checklist";
const MAX_FILE_STEM_CHARS: usize = 80;

static UNSAFE_FILENAME_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1F]+"#).expect("valid filename regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

#[derive(Debug)]
pub enum ExchangeError {
    Io(io::Error),
    Decode(serde_json::Error),
    Encode(serde_json::Error),
    Validation(ValidationError),
}

impl Display for ExchangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "file access failed: {err}"),
            Self::Decode(err) => write!(f, "file is not a valid document: {err}"),
            Self::Encode(err) => write!(f, "could not encode document: {err}"),
            Self::Validation(err) => write!(f, "document failed validation: {err}"),
        }
    }
}

impl Error for ExchangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Decode(err) | Self::Encode(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<io::Error> for ExchangeError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ValidationError> for ExchangeError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Encodes one checklist as a `.shipchecklist` document.
pub fn export_checklist(checklist: &CustomChecklist) -> ExchangeResult<String> {
    serde_json::to_string_pretty(checklist).map_err(ExchangeError::Encode)
}

/// Decodes a `.shipchecklist` document and assigns a fresh id.
pub fn import_checklist(document: &str) -> ExchangeResult<CustomChecklist> {
    let decoded: CustomChecklist =
        serde_json::from_str(document).map_err(ExchangeError::Decode)?;
    decoded.validate()?;
    let imported = decoded.with_fresh_id();
    info!(
        "event=checklist_import module=exchange status=ok id={}",
        imported.id
    );
    Ok(imported)
}

/// Writes a checklist into `dir` as `<sanitized title>.shipchecklist`.
///
/// A file left by another checklist with the same title is kept; the new
/// file gets a ` (2)`, ` (3)`, ... suffix instead. Re-exporting the same
/// checklist replaces its earlier file.
pub fn write_checklist_file(dir: &Path, checklist: &CustomChecklist) -> ExchangeResult<PathBuf> {
    let document = export_checklist(checklist)?;
    std::fs::create_dir_all(dir)?;
    let path = checklist_export_path(dir, checklist);
    std::fs::write(&path, document)?;
    info!("event=checklist_export module=exchange status=ok id={}", checklist.id);
    Ok(path)
}

fn checklist_export_path(dir: &Path, checklist: &CustomChecklist) -> PathBuf {
    let stem = sanitize_file_stem(&checklist.title);
    (1u32..)
        .map(|attempt| match attempt {
            1 => dir.join(format!("{stem}.{CHECKLIST_FILE_EXTENSION}")),
            n => dir.join(format!("{stem} ({n}).{CHECKLIST_FILE_EXTENSION}")),
        })
        .find(|path| !path.exists() || holds_checklist(path, checklist))
        .unwrap_or_else(|| dir.join(format!("{}.{CHECKLIST_FILE_EXTENSION}", checklist.id)))
}

fn holds_checklist(path: &Path, checklist: &CustomChecklist) -> bool {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|document| serde_json::from_str::<CustomChecklist>(&document).ok())
        .is_some_and(|existing| existing.id == checklist.id)
}

pub fn read_checklist_file(path: &Path) -> ExchangeResult<CustomChecklist> {
    let document = std::fs::read_to_string(path)?;
    import_checklist(&document)
}

pub fn export_contacts(categories: &[ContactCategory]) -> ExchangeResult<String> {
    serde_json::to_string_pretty(categories).map_err(ExchangeError::Encode)
}

/// Decodes a `.shipcontacts` document; the result replaces the directory.
pub fn import_contacts(document: &str) -> ExchangeResult<Vec<ContactCategory>> {
    serde_json::from_str(document).map_err(ExchangeError::Decode)
}

pub fn write_contacts_file(
    dir: &Path,
    file_stem: &str,
    categories: &[ContactCategory],
) -> ExchangeResult<PathBuf> {
    let document = export_contacts(categories)?;
    let path = dir.join(format!(
        "{}.{CONTACTS_FILE_EXTENSION}",
        sanitize_file_stem(file_stem)
    ));
    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, document)?;
    info!(
        "event=contacts_export module=exchange status=ok categories={}",
        categories.len()
    );
    Ok(path)
}

pub fn read_contacts_file(path: &Path) -> ExchangeResult<Vec<ContactCategory>> {
    let document = std::fs::read_to_string(path)?;
    import_contacts(&document)
}

/// Turns a user-entered title into a portable file stem.
pub fn sanitize_file_stem(title: &str) -> String {
    let without_unsafe = UNSAFE_FILENAME_CHARS_RE.replace_all(title, " ");
    let collapsed = WHITESPACE_RE.replace_all(&without_unsafe, " ");
    let capped: String = collapsed
        .trim()
        .trim_matches('.')
        .chars()
        .take(MAX_FILE_STEM_CHARS)
        .collect();
    let stem = capped.trim_end().trim_end_matches('.').trim_end();
    if stem.is_empty() {
        return FALLBACK_FILE_STEM.to_string();
    }
    stem.to_string()
}
