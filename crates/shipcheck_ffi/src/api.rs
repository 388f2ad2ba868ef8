//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Carry domain values across the boundary as JSON payloads in one
//!   response envelope.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Payloads use the same camelCase JSON shapes the stores persist.
//! - Each call opens its own connection; no state is cached besides the
//!   resolved DB path and photo directory.

use log::warn;
use serde::Serialize;
use shipcheck_core::db::open_db;
use shipcheck_core::service::exchange::{
    read_checklist_file, read_contacts_file, write_checklist_file, write_contacts_file,
};
use shipcheck_core::{
    built_in_checklists, core_version as core_version_inner, init_logging as init_logging_inner,
    ping as ping_inner, ArchiveStore, ArchivedChecklist, BuiltInFavoritesStore, ChecklistId,
    ChecklistNotesStore, ChecklistRef, ChecklistService, ContactCategory, ContactStore,
    CustomChecklist, CustomChecklistStore, FavoriteCategory, FavoriteCategoryStore, FavoriteEntry,
    FavoritesService, PhotoStorage, ReportMetadata, SqliteKvStore,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "shipcheck.sqlite3";
const PHOTO_DIR_NAME: &str = "shipcheck_photos";
const CONTACTS_FILE_STEM: &str = "Contacts";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static PHOTO_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Response envelope shared by every DB-backed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfiResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// JSON-encoded result value on success.
    pub payload: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl FfiResponse {
    fn success<T: Serialize>(op: &str, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(payload) => Self {
                ok: true,
                payload: Some(payload),
                message: String::new(),
            },
            Err(err) => Self::failure(op, format!("encode failed: {err}")),
        }
    }

    fn failure(op: &str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!("event=ffi_call module=ffi status=error op={op} error={reason}");
        Self {
            ok: false,
            payload: None,
            message: format!("{op} failed: {reason}"),
        }
    }
}

/// Returns the pristine built-in catalog as a JSON array.
#[flutter_rust_bridge::frb(sync)]
pub fn builtin_catalog() -> FfiResponse {
    FfiResponse::success("builtin_catalog", &built_in_checklists())
}

/// Loads one built-in with its saved item state.
#[flutter_rust_bridge::frb(sync)]
pub fn builtin_load(title: String) -> FfiResponse {
    with_checklists("builtin_load", |service| {
        service.load_builtin(&title).map_err(|err| err.to_string())
    })
}

/// Sets check state of one built-in item; returns the updated checklist.
#[flutter_rust_bridge::frb(sync)]
pub fn builtin_set_item_checked(
    title: String,
    section_index: u32,
    row_index: u32,
    checked: bool,
) -> FfiResponse {
    with_checklists("builtin_set_item_checked", |service| {
        service
            .set_builtin_item_checked(
                &title,
                section_index as usize,
                row_index as usize,
                checked,
                chrono_now(),
            )
            .map_err(|err| err.to_string())
    })
}

/// Stores photo bytes and attaches the file to one built-in item.
///
/// The stored file is deleted again when the item rejects it.
#[flutter_rust_bridge::frb(sync)]
pub fn builtin_attach_photo(
    title: String,
    section_index: u32,
    row_index: u32,
    bytes: Vec<u8>,
) -> FfiResponse {
    with_store("builtin_attach_photo", |kv, photos| {
        let filename = photos.save(&bytes).map_err(|err| err.to_string())?;
        ChecklistService::new(kv, photos)
            .attach_builtin_photo(&title, section_index as usize, row_index as usize, &filename)
            .map_err(|err| {
                photos.delete_all(&[filename.clone()]);
                err.to_string()
            })
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn builtin_remove_photo(
    title: String,
    section_index: u32,
    row_index: u32,
    filename: String,
) -> FfiResponse {
    with_checklists("builtin_remove_photo", |service| {
        service
            .remove_builtin_photo(&title, section_index as usize, row_index as usize, &filename)
            .map_err(|err| err.to_string())
    })
}

/// Stores one built-in quick note; `None` or blank text removes it.
#[flutter_rust_bridge::frb(sync)]
pub fn builtin_set_quick_note(
    title: String,
    section_index: u32,
    row_index: u32,
    text: Option<String>,
) -> FfiResponse {
    let text = text.filter(|value| !value.trim().is_empty());
    with_checklists("builtin_set_quick_note", |service| {
        service
            .set_builtin_quick_note(
                &title,
                section_index as usize,
                row_index as usize,
                text.as_deref(),
            )
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn builtin_quick_note(title: String, section_index: u32, row_index: u32) -> FfiResponse {
    with_checklists("builtin_quick_note", |service| {
        Ok(service.builtin_quick_note(&title, section_index as usize, row_index as usize))
    })
}

/// Returns the built-in with overlay state and quick notes merged.
#[flutter_rust_bridge::frb(sync)]
pub fn builtin_export_snapshot(title: String) -> FfiResponse {
    with_checklists("builtin_export_snapshot", |service| {
        service
            .builtin_export_snapshot(&title)
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn builtin_clear(title: String) -> FfiResponse {
    with_checklists("builtin_clear", |service| {
        service.clear_builtin(&title).map_err(|err| err.to_string())
    })
}

/// Copies a built-in into a new stored custom checklist.
#[flutter_rust_bridge::frb(sync)]
pub fn builtin_convert_to_custom(title: String) -> FfiResponse {
    with_checklists("builtin_convert_to_custom", |service| {
        service
            .convert_builtin_to_custom(&title)
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn builtin_is_favorite(title: String) -> FfiResponse {
    with_store("builtin_is_favorite", |kv, _| {
        Ok(BuiltInFavoritesStore::new(kv).is_favorite(&title))
    })
}

/// Flips the favorite flag of a built-in; payload is the new state.
#[flutter_rust_bridge::frb(sync)]
pub fn builtin_toggle_favorite(title: String) -> FfiResponse {
    with_store("builtin_toggle_favorite", |kv, _| {
        Ok(BuiltInFavoritesStore::new(kv).toggle_favorite(&title))
    })
}

/// Lists custom checklists, most recently added first.
#[flutter_rust_bridge::frb(sync)]
pub fn custom_list() -> FfiResponse {
    with_store("custom_list", |kv, _| {
        Ok(CustomChecklistStore::new(kv).load_all())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn custom_add(checklist_json: String) -> FfiResponse {
    with_store("custom_add", |kv, _| {
        let checklist = decode_custom(&checklist_json)?;
        CustomChecklistStore::new(kv).add(&checklist);
        Ok(checklist)
    })
}

/// Replaces the stored record with the same id; missing ids are ignored.
#[flutter_rust_bridge::frb(sync)]
pub fn custom_update(checklist_json: String) -> FfiResponse {
    with_store("custom_update", |kv, _| {
        let checklist = decode_custom(&checklist_json)?;
        CustomChecklistStore::new(kv).update(&checklist);
        Ok(checklist)
    })
}

/// Overwrites the whole collection, given in persisted order.
#[flutter_rust_bridge::frb(sync)]
pub fn custom_save_all(checklists_json: String) -> FfiResponse {
    with_store("custom_save_all", |kv, _| {
        let checklists: Vec<CustomChecklist> =
            serde_json::from_str(&checklists_json).map_err(|err| err.to_string())?;
        if let Some(err) = checklists.iter().find_map(|record| record.validate().err()) {
            return Err(err.to_string());
        }
        CustomChecklistStore::new(kv).save_all(&checklists);
        Ok(checklists.len())
    })
}

/// Deletes a custom checklist with its photos, notes and category entries.
#[flutter_rust_bridge::frb(sync)]
pub fn custom_delete(id: String) -> FfiResponse {
    with_store("custom_delete", |kv, photos| {
        let id = parse_id(&id)?;
        let Some(checklist) = CustomChecklistStore::new(kv).get(id) else {
            return Ok(false);
        };
        ChecklistService::new(kv, photos).delete_custom(&checklist);
        Ok(true)
    })
}

/// Flips one item of a custom checklist; returns the updated record.
#[flutter_rust_bridge::frb(sync)]
pub fn custom_toggle_item(id: String, section_index: u32, row_index: u32) -> FfiResponse {
    with_store("custom_toggle_item", |kv, photos| {
        let id = parse_id(&id)?;
        ChecklistService::new(kv, photos)
            .toggle_custom_item(id, section_index as usize, row_index as usize, chrono_now())
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn custom_clear(id: String) -> FfiResponse {
    with_store("custom_clear", |kv, photos| {
        let id = parse_id(&id)?;
        ChecklistService::new(kv, photos)
            .clear_custom(id)
            .map_err(|err| err.to_string())
    })
}

/// Flips the favorite flag of a custom checklist; payload is the new state.
#[flutter_rust_bridge::frb(sync)]
pub fn custom_toggle_favorite(id: String) -> FfiResponse {
    with_store("custom_toggle_favorite", |kv, _| {
        let id = parse_id(&id)?;
        FavoritesService::new(kv)
            .toggle_custom(id)
            .ok_or_else(|| format!("custom checklist not found: {id}"))
    })
}

/// Writes a `.shipchecklist` file into `dir`; payload is the file path.
#[flutter_rust_bridge::frb(sync)]
pub fn custom_export_file(id: String, dir: String) -> FfiResponse {
    with_store("custom_export_file", |kv, _| {
        let id = parse_id(&id)?;
        let checklist = CustomChecklistStore::new(kv)
            .get(id)
            .ok_or_else(|| format!("custom checklist not found: {id}"))?;
        let path = write_checklist_file(Path::new(dir.trim()), &checklist)
            .map_err(|err| err.to_string())?;
        Ok(path.to_string_lossy().into_owned())
    })
}

/// Imports a `.shipchecklist` file as a new custom checklist.
#[flutter_rust_bridge::frb(sync)]
pub fn custom_import_file(path: String) -> FfiResponse {
    with_store("custom_import_file", |kv, _| {
        let checklist =
            read_checklist_file(Path::new(path.trim())).map_err(|err| err.to_string())?;
        CustomChecklistStore::new(kv).add(&checklist);
        Ok(checklist)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn archive_list() -> FfiResponse {
    with_store("archive_list", |kv, _| Ok(ArchiveStore::new(kv).load_all()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn archive_builtin(title: String) -> FfiResponse {
    with_checklists("archive_builtin", |service| {
        service.archive_builtin(&title).map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn archive_custom(id: String) -> FfiResponse {
    with_store("archive_custom", |kv, photos| {
        let id = parse_id(&id)?;
        ChecklistService::new(kv, photos)
            .archive_custom(id)
            .map_err(|err| err.to_string())
    })
}

/// Removes archived entries with the same identity as `entry_json`.
#[flutter_rust_bridge::frb(sync)]
pub fn archive_delete(entry_json: String) -> FfiResponse {
    with_store("archive_delete", |kv, _| {
        let entry: ArchivedChecklist =
            serde_json::from_str(&entry_json).map_err(|err| err.to_string())?;
        ArchiveStore::new(kv).delete(&entry);
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn archive_clear() -> FfiResponse {
    with_store("archive_clear", |kv, _| {
        ArchiveStore::new(kv).clear_all();
        Ok(())
    })
}

/// Returns the favorites view: recomputed default category first.
#[flutter_rust_bridge::frb(sync)]
pub fn favorites_view() -> FfiResponse {
    with_store("favorites_view", |kv, _| Ok(FavoritesService::new(kv).load_view()))
}

/// Persists reordered categories; default-category entries are ignored.
#[flutter_rust_bridge::frb(sync)]
pub fn favorites_save_all(categories_json: String) -> FfiResponse {
    with_store("favorites_save_all", |kv, _| {
        let categories: Vec<FavoriteCategory> =
            serde_json::from_str(&categories_json).map_err(|err| err.to_string())?;
        FavoriteCategoryStore::new(kv).save_all(&categories);
        Ok(categories.len())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn favorites_create_category(name: String, first_entry_json: String) -> FfiResponse {
    with_store("favorites_create_category", |kv, _| {
        let entry = decode_entry(&first_entry_json)?;
        FavoriteCategoryStore::new(kv)
            .create_category(&name, &entry)
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn favorites_rename_category(from: String, to: String) -> FfiResponse {
    with_store("favorites_rename_category", |kv, _| {
        FavoriteCategoryStore::new(kv)
            .rename_category(&from, &to)
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn favorites_delete_category(name: String) -> FfiResponse {
    with_store("favorites_delete_category", |kv, _| {
        FavoriteCategoryStore::new(kv)
            .delete_category(&name)
            .map_err(|err| err.to_string())
    })
}

/// Inserts (or moves) an entry within a user category.
#[flutter_rust_bridge::frb(sync)]
pub fn favorites_add_entry(
    category: String,
    entry_json: String,
    index: Option<u32>,
) -> FfiResponse {
    with_store("favorites_add_entry", |kv, _| {
        let entry = decode_entry(&entry_json)?;
        FavoriteCategoryStore::new(kv)
            .add_entry(&category, &entry, index.map(|value| value as usize))
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn favorites_remove_entry(category: String, entry_json: String) -> FfiResponse {
    with_store("favorites_remove_entry", |kv, _| {
        let entry = decode_entry(&entry_json)?;
        FavoriteCategoryStore::new(kv)
            .remove_entry(&category, &entry)
            .map_err(|err| err.to_string())
    })
}

/// Reads checklist-level notes.
///
/// `key` is the title for built-ins and the id for custom checklists.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_notes_get(is_custom: bool, key: String) -> FfiResponse {
    with_store("checklist_notes_get", |kv, _| {
        let reference = checklist_ref(is_custom, &key)?;
        Ok(ChecklistNotesStore::new(kv).get(&reference))
    })
}

/// Stores checklist-level notes; `None` removes them.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_notes_set(is_custom: bool, key: String, text: Option<String>) -> FfiResponse {
    with_store("checklist_notes_set", |kv, _| {
        let reference = checklist_ref(is_custom, &key)?;
        ChecklistNotesStore::new(kv).set(&reference, text.as_deref());
        Ok(())
    })
}

/// Builds a render-ready report. `metadata_json` may be empty.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_report(is_custom: bool, key: String, metadata_json: String) -> FfiResponse {
    with_store("checklist_report", |kv, photos| {
        let metadata = decode_metadata(&metadata_json)?;
        let service = ChecklistService::new(kv, photos);
        let report = match checklist_ref(is_custom, &key)? {
            ChecklistRef::BuiltIn(title) => service.builtin_report(&title, metadata, chrono_now()),
            ChecklistRef::Custom(id) => service.custom_report(id, metadata, chrono_now()),
        };
        report.map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn contacts_load() -> FfiResponse {
    with_store("contacts_load", |kv, _| Ok(ContactStore::new(kv).load_all()))
}

/// Replaces the contact directory.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_save(categories_json: String) -> FfiResponse {
    with_store("contacts_save", |kv, _| {
        let categories: Vec<ContactCategory> =
            serde_json::from_str(&categories_json).map_err(|err| err.to_string())?;
        ContactStore::new(kv).save_all(&categories);
        Ok(categories.len())
    })
}

/// Writes the contact directory as a `.shipcontacts` file into `dir`.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_export_file(dir: String) -> FfiResponse {
    with_store("contacts_export_file", |kv, _| {
        let categories = ContactStore::new(kv).load_all();
        let path = write_contacts_file(Path::new(dir.trim()), CONTACTS_FILE_STEM, &categories)
            .map_err(|err| err.to_string())?;
        Ok(path.to_string_lossy().into_owned())
    })
}

/// Replaces the contact directory with the content of a `.shipcontacts` file.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_import_file(path: String) -> FfiResponse {
    with_store("contacts_import_file", |kv, _| {
        let categories =
            read_contacts_file(Path::new(path.trim())).map_err(|err| err.to_string())?;
        ContactStore::new(kv).save_all(&categories);
        Ok(categories)
    })
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            env_path("SHIPCHECK_DB_PATH").unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME))
        })
        .clone()
}

fn resolve_photo_dir() -> PathBuf {
    PHOTO_DIR
        .get_or_init(|| {
            env_path("SHIPCHECK_PHOTO_DIR")
                .unwrap_or_else(|| std::env::temp_dir().join(PHOTO_DIR_NAME))
        })
        .clone()
}

fn env_path(name: &str) -> Option<PathBuf> {
    let raw = std::env::var(name).ok()?;
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

fn with_store<T: Serialize>(
    op: &str,
    f: impl FnOnce(&SqliteKvStore<'_>, &PhotoStorage) -> Result<T, String>,
) -> FfiResponse {
    let conn = match open_db(resolve_db_path()) {
        Ok(conn) => conn,
        Err(err) => return FfiResponse::failure(op, format!("DB open failed: {err}")),
    };
    let kv = SqliteKvStore::new(&conn);
    let photos = PhotoStorage::new(resolve_photo_dir());
    match f(&kv, &photos) {
        Ok(value) => FfiResponse::success(op, &value),
        Err(err) => FfiResponse::failure(op, err),
    }
}

fn with_checklists<T: Serialize>(
    op: &str,
    f: impl FnOnce(&ChecklistService<'_, SqliteKvStore<'_>>) -> Result<T, String>,
) -> FfiResponse {
    with_store(op, |kv, photos| f(&ChecklistService::new(kv, photos)))
}

fn parse_id(raw: &str) -> Result<ChecklistId, String> {
    uuid::Uuid::parse_str(raw.trim()).map_err(|err| format!("invalid checklist id `{raw}`: {err}"))
}

fn checklist_ref(is_custom: bool, key: &str) -> Result<ChecklistRef, String> {
    if is_custom {
        parse_id(key).map(ChecklistRef::Custom)
    } else {
        Ok(ChecklistRef::BuiltIn(key.to_string()))
    }
}

fn decode_custom(raw: &str) -> Result<CustomChecklist, String> {
    let checklist: CustomChecklist = serde_json::from_str(raw).map_err(|err| err.to_string())?;
    checklist.validate().map_err(|err| err.to_string())?;
    Ok(checklist)
}

fn decode_entry(raw: &str) -> Result<FavoriteEntry, String> {
    serde_json::from_str(raw).map_err(|err| format!("invalid favorite entry: {err}"))
}

fn decode_metadata(raw: &str) -> Result<ReportMetadata, String> {
    if raw.trim().is_empty() {
        return Ok(ReportMetadata::default());
    }
    serde_json::from_str(raw).map_err(|err| format!("invalid report metadata: {err}"))
}

fn chrono_now() -> chrono::DateTime<chrono::Local> {
    chrono::Local::now()
}
