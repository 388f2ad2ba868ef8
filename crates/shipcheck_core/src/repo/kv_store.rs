//! Key-value persistence contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the string-keyed blob storage every checklist family uses.
//! - Centralize JSON encode/decode and the failure-absorption policy.
//!
//! # Invariants
//! - Key strings are part of the persisted compatibility surface.
//! - `load_json` never fails: missing, unreadable and corrupt payloads all
//!   collapse to `None`, and each non-missing case is logged.
//! - `store_json` never fails: encode and write errors are logged and the
//!   write is dropped.

use crate::db::DbError;
use log::{error, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for key-value operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialize(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "serialization failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Persisted key names and key builders.
pub mod keys {
    pub const CUSTOM_CHECKLISTS: &str = "customChecklists";
    pub const ARCHIVED_CHECKLISTS: &str = "archivedChecklists";
    pub const BUILT_IN_FAVORITES: &str = "BuiltInFavorites";
    pub const FAVORITES_CATEGORIES: &str = "FavoritesCategories";
    pub const CONTACT_CATEGORIES: &str = "ContactCategories";
    pub const BUILT_IN_OVERLAY_PREFIX: &str = "builtin_checklist_";
    pub const QUICK_NOTE_PREFIX: &str = "quickNote_builtin_";

    pub fn builtin_overlay(title: &str) -> String {
        format!("{BUILT_IN_OVERLAY_PREFIX}{title}")
    }

    pub fn builtin_quick_note(title: &str, section_index: usize, row_index: usize) -> String {
        format!("{QUICK_NOTE_PREFIX}{title}_s{section_index}_r{row_index}")
    }

    /// Prefix shared by every quick-note key of one built-in title.
    pub fn builtin_quick_note_prefix(title: &str) -> String {
        format!("{QUICK_NOTE_PREFIX}{title}_s")
    }

    pub fn custom_notes(id: &uuid::Uuid) -> String {
        format!("notes_{id}")
    }

    pub fn builtin_notes(title: &str) -> String {
        format!("notes_builtin_{title}")
    }
}

/// String-keyed blob storage.
///
/// Mirrors the platform key-value store: last write wins, no transactions
/// across keys.
pub trait KvStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> RepoResult<()>;
    /// Returns keys starting with `prefix`, sorted ascending.
    fn keys_with_prefix(&self, prefix: &str) -> RepoResult<Vec<String>>;
}

/// SQLite-backed key-value store over table `kv_entries`.
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KvStore for SqliteKvStore<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> RepoResult<Vec<String>> {
        // substr comparison avoids LIKE wildcard escaping for titles with `_`.
        let mut stmt = self.conn.prepare(
            "SELECT key FROM kv_entries
             WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY key ASC;",
        )?;
        let mut rows = stmt.query([prefix])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get::<_, String>(0)?);
        }
        Ok(keys)
    }
}

/// Reads and decodes one JSON value, absorbing every failure into `None`.
pub fn load_json<T: DeserializeOwned>(kv: &impl KvStore, key: &str) -> Option<T> {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            error!("event=kv_read module=repo status=error key={key} error={err}");
            return None;
        }
    };

    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                "event=kv_decode module=repo status=fallback key={key} error_code=decode_failed error={err}"
            );
            None
        }
    }
}

/// Encodes and writes one JSON value, absorbing every failure.
///
/// Returns whether the write landed, for callers that log outcomes.
pub fn store_json<T: Serialize + ?Sized>(kv: &impl KvStore, key: &str, value: &T) -> bool {
    let encoded = match serde_json::to_string(value) {
        Ok(encoded) => encoded,
        Err(err) => {
            error!(
                "event=kv_write module=repo status=error key={key} error_code=encode_failed error={err}"
            );
            return false;
        }
    };

    match kv.set(key, &encoded) {
        Ok(()) => true,
        Err(err) => {
            error!(
                "event=kv_write module=repo status=error key={key} error_code=write_failed error={err}"
            );
            false
        }
    }
}

/// Reads a raw text value, absorbing read failures into `None`.
pub fn load_text(kv: &impl KvStore, key: &str) -> Option<String> {
    kv.get(key).unwrap_or_else(|err| {
        error!("event=kv_read module=repo status=error key={key} error={err}");
        None
    })
}

/// Writes a raw text value, absorbing write failures.
pub fn store_text(kv: &impl KvStore, key: &str, text: &str) -> bool {
    match kv.set(key, text) {
        Ok(()) => true,
        Err(err) => {
            error!(
                "event=kv_write module=repo status=error key={key} error_code=write_failed error={err}"
            );
            false
        }
    }
}

/// Removes one key, logging instead of failing.
pub fn remove_key(kv: &impl KvStore, key: &str) {
    if let Err(err) = kv.remove(key) {
        error!("event=kv_remove module=repo status=error key={key} error={err}");
    }
}

/// Lists keys by prefix, logging and returning an empty list on failure.
pub fn keys_with_prefix(kv: &impl KvStore, prefix: &str) -> Vec<String> {
    kv.keys_with_prefix(prefix).unwrap_or_else(|err| {
        error!("event=kv_scan module=repo status=error prefix={prefix} error={err}");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::keys;
    use uuid::Uuid;

    #[test]
    fn key_builders_match_persisted_layout() {
        assert_eq!(
            keys::builtin_overlay("Pre-Departure"),
            "builtin_checklist_Pre-Departure"
        );
        assert_eq!(
            keys::builtin_quick_note("Man Overboard", 1, 3),
            "quickNote_builtin_Man Overboard_s1_r3"
        );
        assert_eq!(keys::builtin_notes("Engine Failure"), "notes_builtin_Engine Failure");

        let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
        assert_eq!(
            keys::custom_notes(&id),
            "notes_11111111-2222-4333-8444-555555555555"
        );
    }
}
