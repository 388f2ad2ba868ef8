//! Checklist use-case service.
//!
//! # Responsibility
//! - Orchestrate the per-family stores for screen-level operations: item
//!   edits, clearing, conversion, deletion, archiving, export snapshots.
//! - Keep photo file cleanup ordered before the record changes it follows.
//!
//! # Invariants
//! - Clearing a built-in deletes overlay photos, then quick notes, then the
//!   overlay key. These steps are not transactional.
//! - Conversion and archiving produce snapshots; nothing links back to the
//!   live record.

use crate::model::archive::ArchivedChecklist;
use crate::model::checklist::{
    ChecklistId, ChecklistInfo, ChecklistItem, ChecklistSection, CustomChecklist,
    ValidationError,
};
use crate::model::favorite::FavoriteEntry;
use crate::photo::PhotoStorage;
use crate::repo::archive_repo::ArchiveStore;
use crate::repo::builtin_state_repo::BuiltInStateStore;
use crate::repo::custom_repo::CustomChecklistStore;
use crate::repo::favorite_repo::FavoriteCategoryStore;
use crate::repo::kv_store::KvStore;
use crate::repo::notes_repo::{ChecklistNotesStore, ChecklistRef};
use crate::repo::quick_note_repo::QuickNoteStore;
use chrono::{DateTime, Local};
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Photos per item carried into a report.
pub const REPORT_PHOTOS_PER_ITEM: usize = 2;

const REPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Service error for checklist use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecklistServiceError {
    /// Title is not part of the built-in catalog.
    UnknownBuiltIn(String),
    /// No custom checklist with this id.
    CustomNotFound(ChecklistId),
    /// Section/row position does not exist.
    ItemNotFound { section_index: usize, row_index: usize },
    Validation(ValidationError),
}

impl Display for ChecklistServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBuiltIn(title) => write!(f, "unknown built-in checklist: {title}"),
            Self::CustomNotFound(id) => write!(f, "custom checklist not found: {id}"),
            Self::ItemNotFound {
                section_index,
                row_index,
            } => write!(f, "no item at section {section_index}, row {row_index}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ChecklistServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ChecklistServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Pilot and vessel details printed on a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportMetadata {
    pub pilot_name: Option<String>,
    pub vessel_name: Option<String>,
    pub location: Option<String>,
}

/// Render-ready snapshot consumed by the PDF exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistReport {
    pub title: String,
    pub generated_at: String,
    pub metadata: ReportMetadata,
    pub sections: Vec<ChecklistSection>,
    pub notes: Option<String>,
    pub checked_count: usize,
    pub total_count: usize,
}

/// Checklist facade over the per-family stores.
pub struct ChecklistService<'a, K: KvStore> {
    builtins: BuiltInStateStore<'a, K>,
    quick_notes: QuickNoteStore<'a, K>,
    customs: CustomChecklistStore<'a, K>,
    notes: ChecklistNotesStore<'a, K>,
    archives: ArchiveStore<'a, K>,
    categories: FavoriteCategoryStore<'a, K>,
    photos: &'a PhotoStorage,
}

impl<'a, K: KvStore> ChecklistService<'a, K> {
    pub fn new(kv: &'a K, photos: &'a PhotoStorage) -> Self {
        Self {
            builtins: BuiltInStateStore::new(kv),
            quick_notes: QuickNoteStore::new(kv),
            customs: CustomChecklistStore::new(kv),
            notes: ChecklistNotesStore::new(kv),
            archives: ArchiveStore::new(kv),
            categories: FavoriteCategoryStore::new(kv),
            photos,
        }
    }

    /// Loads one built-in with its saved fill-in state.
    pub fn load_builtin(&self, title: &str) -> Result<ChecklistInfo, ChecklistServiceError> {
        self.builtins
            .load(title)
            .ok_or_else(|| ChecklistServiceError::UnknownBuiltIn(title.to_string()))
    }

    /// Sets check state on one built-in item and saves the overlay.
    pub fn set_builtin_item_checked(
        &self,
        title: &str,
        section_index: usize,
        row_index: usize,
        checked: bool,
        at: DateTime<Local>,
    ) -> Result<ChecklistInfo, ChecklistServiceError> {
        let mut checklist = self.load_builtin(title)?;
        builtin_item(&mut checklist, section_index, row_index)?.set_checked(checked, at);
        self.builtins.save(&checklist);
        Ok(checklist)
    }

    /// Attaches a stored photo file to one built-in item.
    pub fn attach_builtin_photo(
        &self,
        title: &str,
        section_index: usize,
        row_index: usize,
        filename: &str,
    ) -> Result<ChecklistInfo, ChecklistServiceError> {
        let mut checklist = self.load_builtin(title)?;
        builtin_item(&mut checklist, section_index, row_index)?.attach_photo(filename)?;
        self.builtins.save(&checklist);
        Ok(checklist)
    }

    /// Detaches one photo from a built-in item and deletes its file.
    pub fn remove_builtin_photo(
        &self,
        title: &str,
        section_index: usize,
        row_index: usize,
        filename: &str,
    ) -> Result<ChecklistInfo, ChecklistServiceError> {
        let mut checklist = self.load_builtin(title)?;
        if builtin_item(&mut checklist, section_index, row_index)?.remove_photo(filename) {
            self.photos.delete_all(&[filename.to_string()]);
            self.builtins.save(&checklist);
        }
        Ok(checklist)
    }

    /// Stores or removes the quick note of one built-in item.
    pub fn set_builtin_quick_note(
        &self,
        title: &str,
        section_index: usize,
        row_index: usize,
        text: Option<&str>,
    ) -> Result<(), ChecklistServiceError> {
        let mut checklist = self.load_builtin(title)?;
        builtin_item(&mut checklist, section_index, row_index)?;
        self.quick_notes.set(title, section_index, row_index, text);
        Ok(())
    }

    pub fn builtin_quick_note(
        &self,
        title: &str,
        section_index: usize,
        row_index: usize,
    ) -> Option<String> {
        self.quick_notes.get(title, section_index, row_index)
    }

    /// Resets a built-in to its pristine template.
    ///
    /// Deletes photo files referenced by the overlay, every quick note of
    /// the title, and finally the overlay itself.
    pub fn clear_builtin(&self, title: &str) -> Result<(), ChecklistServiceError> {
        let checklist = self.load_builtin(title)?;
        let photos = checklist.photo_filenames();
        self.photos.delete_all(&photos);
        let notes_removed = self.quick_notes.clear_title(title);
        self.builtins.clear(title);
        info!(
            "event=builtin_clear module=service status=ok photos={} quick_notes={notes_removed}",
            photos.len()
        );
        Ok(())
    }

    /// Built-in with overlay state and side-table quick notes merged in.
    pub fn builtin_export_snapshot(
        &self,
        title: &str,
    ) -> Result<ChecklistInfo, ChecklistServiceError> {
        let mut checklist = self.load_builtin(title)?;
        self.quick_notes.merge_into(&mut checklist);
        Ok(checklist)
    }

    /// Copies a built-in (with its current state and notes) into a new
    /// custom checklist and stores it.
    pub fn convert_builtin_to_custom(
        &self,
        title: &str,
    ) -> Result<CustomChecklist, ChecklistServiceError> {
        let custom = self.builtin_export_snapshot(title)?.convert_to_custom();
        self.customs.add(&custom);
        info!(
            "event=builtin_convert module=service status=ok id={}",
            custom.id
        );
        Ok(custom)
    }

    /// Deletes a custom checklist with its photos, notes and category
    /// entries.
    pub fn delete_custom(&self, checklist: &CustomChecklist) {
        // Stored copy may reference photos the caller's copy does not.
        let stored = self.customs.get(checklist.id);
        let mut photos = checklist.photo_filenames();
        if let Some(stored) = stored.as_ref() {
            photos.extend(stored.photo_filenames());
        }
        photos.sort();
        photos.dedup();
        self.photos.delete_all(&photos);

        let reference = ChecklistRef::Custom(checklist.id);
        self.notes.set(&reference, None);
        self.categories
            .remove_entry_everywhere(&FavoriteEntry::custom(checklist.id));
        self.customs.delete(checklist);
        info!(
            "event=custom_delete module=service status=ok id={} photos={}",
            checklist.id,
            photos.len()
        );
    }

    /// Flips one item of a custom checklist and saves the record.
    pub fn toggle_custom_item(
        &self,
        id: ChecklistId,
        section_index: usize,
        row_index: usize,
        at: DateTime<Local>,
    ) -> Result<CustomChecklist, ChecklistServiceError> {
        let mut checklist = self
            .customs
            .get(id)
            .ok_or(ChecklistServiceError::CustomNotFound(id))?;
        checklist
            .item_mut(section_index, row_index)
            .ok_or(ChecklistServiceError::ItemNotFound {
                section_index,
                row_index,
            })?
            .toggle(at);
        self.customs.update(&checklist);
        Ok(checklist)
    }

    /// Resets every item of a custom checklist, keeping its structure.
    pub fn clear_custom(
        &self,
        id: ChecklistId,
    ) -> Result<CustomChecklist, ChecklistServiceError> {
        let mut checklist = self
            .customs
            .get(id)
            .ok_or(ChecklistServiceError::CustomNotFound(id))?;
        let photos = checklist.clear_items();
        self.photos.delete_all(&photos);
        self.customs.update(&checklist);
        Ok(checklist)
    }

    /// Archives a snapshot of a built-in including its quick notes.
    pub fn archive_builtin(
        &self,
        title: &str,
    ) -> Result<ArchivedChecklist, ChecklistServiceError> {
        let entry = ArchivedChecklist::BuiltIn(self.builtin_export_snapshot(title)?);
        self.archives.add(&entry);
        Ok(entry)
    }

    pub fn archive_custom(
        &self,
        id: ChecklistId,
    ) -> Result<ArchivedChecklist, ChecklistServiceError> {
        let checklist = self
            .customs
            .get(id)
            .ok_or(ChecklistServiceError::CustomNotFound(id))?;
        let entry = ArchivedChecklist::Custom(checklist);
        self.archives.add(&entry);
        Ok(entry)
    }

    /// Builds the report for a built-in checklist.
    pub fn builtin_report(
        &self,
        title: &str,
        metadata: ReportMetadata,
        at: DateTime<Local>,
    ) -> Result<ChecklistReport, ChecklistServiceError> {
        let snapshot = self.builtin_export_snapshot(title)?;
        let notes = self.notes.get(&ChecklistRef::BuiltIn(title.to_string()));
        Ok(build_report(snapshot.title, snapshot.sections, notes, metadata, at))
    }

    /// Builds the report for a custom checklist.
    pub fn custom_report(
        &self,
        id: ChecklistId,
        metadata: ReportMetadata,
        at: DateTime<Local>,
    ) -> Result<ChecklistReport, ChecklistServiceError> {
        let checklist = self
            .customs
            .get(id)
            .ok_or(ChecklistServiceError::CustomNotFound(id))?;
        let notes = self.notes.get(&ChecklistRef::Custom(id));
        Ok(build_report(
            checklist.title,
            checklist.sections,
            notes,
            metadata,
            at,
        ))
    }
}

/// Assembles a report from a checklist snapshot.
pub fn build_report(
    title: String,
    mut sections: Vec<ChecklistSection>,
    notes: Option<String>,
    metadata: ReportMetadata,
    at: DateTime<Local>,
) -> ChecklistReport {
    let items = || sections.iter().flat_map(|section| section.items.iter());
    let checked_count = items().filter(|item| item.is_checked).count();
    let total_count = items().count();

    sections
        .iter_mut()
        .flat_map(|section| section.items.iter_mut())
        .for_each(|item| item.photo_filenames.truncate(REPORT_PHOTOS_PER_ITEM));

    ChecklistReport {
        title,
        generated_at: at.format(REPORT_TIME_FORMAT).to_string(),
        metadata,
        sections,
        notes: notes.filter(|text| !text.trim().is_empty()),
        checked_count,
        total_count,
    }
}

fn builtin_item(
    checklist: &mut ChecklistInfo,
    section_index: usize,
    row_index: usize,
) -> Result<&mut ChecklistItem, ChecklistServiceError> {
    checklist
        .item_mut(section_index, row_index)
        .ok_or(ChecklistServiceError::ItemNotFound {
            section_index,
            row_index,
        })
}

