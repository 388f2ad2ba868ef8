//! Checklist domain model.
//!
//! # Responsibility
//! - Define the structure (sections, items) shared by built-in and custom
//!   checklists.
//! - Own per-item fill-in state transitions (check, note, photos).
//!
//! # Invariants
//! - `ChecklistItem::timestamp` is `Some` if and only if `is_checked`.
//! - An item references at most `MAX_PHOTOS_PER_ITEM` photo files.
//! - Section and item order is significant and preserved by serialization.
//! - `CustomChecklist::id` is never nil and never changes after creation.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Maximum photo attachments per checklist item.
pub const MAX_PHOTOS_PER_ITEM: usize = 4;

/// Display format used for check timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Stable identifier of a user-authored checklist.
pub type ChecklistId = Uuid;

/// Model invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// More than `MAX_PHOTOS_PER_ITEM` photos on one item.
    TooManyPhotos { item: String, count: usize },
    /// Item carries a timestamp but is not checked.
    TimestampWithoutCheck { item: String },
    /// Item is checked but carries no timestamp.
    MissingTimestamp { item: String },
    /// Custom checklist id is the nil UUID.
    NilId,
    /// Built-in template title is blank.
    EmptyTitle,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooManyPhotos { item, count } => write!(
                f,
                "item `{item}` has {count} photos; at most {MAX_PHOTOS_PER_ITEM} are allowed"
            ),
            Self::TimestampWithoutCheck { item } => {
                write!(f, "item `{item}` has a timestamp but is not checked")
            }
            Self::MissingTimestamp { item } => {
                write!(f, "item `{item}` is checked but has no timestamp")
            }
            Self::NilId => write!(f, "checklist id must not be nil"),
            Self::EmptyTitle => write!(f, "built-in checklist title must not be empty"),
        }
    }
}

impl Error for ValidationError {}

/// Fill-in state for one line of a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub title: String,
    pub is_checked: bool,
    /// Formatted check time; present only while checked.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Inline for custom checklists; built-ins keep it in the side table.
    #[serde(default)]
    pub quick_note: Option<String>,
    /// Photo file references; the files live outside this model.
    #[serde(default)]
    pub photo_filenames: Vec<String>,
}

impl ChecklistItem {
    /// Creates an unchecked item with no note and no photos.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets check state, stamping or clearing the timestamp to match.
    pub fn set_checked(&mut self, checked: bool, at: DateTime<Local>) {
        self.is_checked = checked;
        self.timestamp = if checked {
            Some(at.format(TIMESTAMP_FORMAT).to_string())
        } else {
            None
        };
    }

    /// Flips check state and returns the new value.
    pub fn toggle(&mut self, at: DateTime<Local>) -> bool {
        let next = !self.is_checked;
        self.set_checked(next, at);
        next
    }

    /// Appends a photo reference.
    ///
    /// # Errors
    /// - `TooManyPhotos` when the item already holds the maximum.
    pub fn attach_photo(&mut self, filename: impl Into<String>) -> Result<(), ValidationError> {
        if self.photo_filenames.len() >= MAX_PHOTOS_PER_ITEM {
            return Err(ValidationError::TooManyPhotos {
                item: self.title.clone(),
                count: self.photo_filenames.len() + 1,
            });
        }
        self.photo_filenames.push(filename.into());
        Ok(())
    }

    /// Removes a photo reference; returns whether it was present.
    pub fn remove_photo(&mut self, filename: &str) -> bool {
        let before = self.photo_filenames.len();
        self.photo_filenames.retain(|name| name != filename);
        before != self.photo_filenames.len()
    }

    /// Resets fill-in state and returns the photo filenames it referenced.
    pub fn clear(&mut self) -> Vec<String> {
        self.is_checked = false;
        self.timestamp = None;
        self.quick_note = None;
        std::mem::take(&mut self.photo_filenames)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.photo_filenames.len() > MAX_PHOTOS_PER_ITEM {
            return Err(ValidationError::TooManyPhotos {
                item: self.title.clone(),
                count: self.photo_filenames.len(),
            });
        }
        match (self.is_checked, self.timestamp.is_some()) {
            (true, false) => Err(ValidationError::MissingTimestamp {
                item: self.title.clone(),
            }),
            (false, true) => Err(ValidationError::TimestampWithoutCheck {
                item: self.title.clone(),
            }),
            _ => Ok(()),
        }
    }
}

/// Named ordered group of items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChecklistSection {
    pub title: String,
    pub items: Vec<ChecklistItem>,
}

impl ChecklistSection {
    pub fn new(title: impl Into<String>, items: Vec<ChecklistItem>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }

    /// Builds a section of fresh items from titles.
    pub fn from_titles<I, S>(title: impl Into<String>, item_titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            title,
            item_titles.into_iter().map(ChecklistItem::new).collect(),
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.items.iter().try_for_each(ChecklistItem::validate)
    }
}

/// Grouping tag for built-in templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChecklistCategory {
    Emergency,
    Standard,
    PostIncident,
}

/// Built-in checklist template plus its fill-in state.
///
/// Identified by `title`; the structure ships with the app and only the
/// item state is persisted per device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistInfo {
    pub title: String,
    pub category: ChecklistCategory,
    pub sections: Vec<ChecklistSection>,
}

impl ChecklistInfo {
    pub fn new(
        title: impl Into<String>,
        category: ChecklistCategory,
        sections: Vec<ChecklistSection>,
    ) -> Self {
        Self {
            title: title.into(),
            category,
            sections,
        }
    }

    /// Snapshots this checklist into a new custom checklist.
    ///
    /// The copy gets a fresh id, is not a favorite, and carries the current
    /// item state. Later edits to either side are independent.
    pub fn convert_to_custom(&self) -> CustomChecklist {
        CustomChecklist {
            id: Uuid::new_v4(),
            title: self.title.clone(),
            is_favorite: false,
            sections: self.sections.clone(),
        }
    }

    pub fn item(&self, section_index: usize, row_index: usize) -> Option<&ChecklistItem> {
        item_at(&self.sections, section_index, row_index)
    }

    pub fn item_mut(
        &mut self,
        section_index: usize,
        row_index: usize,
    ) -> Option<&mut ChecklistItem> {
        item_at_mut(&mut self.sections, section_index, row_index)
    }

    /// All photo filenames referenced by any item.
    pub fn photo_filenames(&self) -> Vec<String> {
        collect_photos(&self.sections)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        self.sections.iter().try_for_each(ChecklistSection::validate)
    }
}

/// User-authored checklist, fully mutable including structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomChecklist {
    pub id: ChecklistId,
    /// Not unique; `id` is the only identity.
    pub title: String,
    #[serde(default)]
    pub is_favorite: bool,
    pub sections: Vec<ChecklistSection>,
}

impl CustomChecklist {
    /// Creates an empty checklist with a generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            is_favorite: false,
            sections: Vec::new(),
        }
    }

    /// Returns a copy under a fresh id, used when importing shared files.
    pub fn with_fresh_id(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    pub fn item(&self, section_index: usize, row_index: usize) -> Option<&ChecklistItem> {
        item_at(&self.sections, section_index, row_index)
    }

    pub fn item_mut(
        &mut self,
        section_index: usize,
        row_index: usize,
    ) -> Option<&mut ChecklistItem> {
        item_at_mut(&mut self.sections, section_index, row_index)
    }

    pub fn photo_filenames(&self) -> Vec<String> {
        collect_photos(&self.sections)
    }

    /// Resets every item while keeping structure; returns removed photos.
    pub fn clear_items(&mut self) -> Vec<String> {
        self.sections
            .iter_mut()
            .flat_map(|section| section.items.iter_mut())
            .flat_map(ChecklistItem::clear)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId);
        }
        self.sections.iter().try_for_each(ChecklistSection::validate)
    }
}

fn item_at(
    sections: &[ChecklistSection],
    section_index: usize,
    row_index: usize,
) -> Option<&ChecklistItem> {
    sections
        .get(section_index)
        .and_then(|section| section.items.get(row_index))
}

fn item_at_mut(
    sections: &mut [ChecklistSection],
    section_index: usize,
    row_index: usize,
) -> Option<&mut ChecklistItem> {
    sections
        .get_mut(section_index)
        .and_then(|section| section.items.get_mut(row_index))
}

fn collect_photos(sections: &[ChecklistSection]) -> Vec<String> {
    sections
        .iter()
        .flat_map(|section| section.items.iter())
        .flat_map(|item| item.photo_filenames.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ChecklistItem, ValidationError, MAX_PHOTOS_PER_ITEM};
    use chrono::{Local, TimeZone};

    #[test]
    fn set_checked_keeps_timestamp_in_step() {
        let at = Local.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap();
        let mut item = ChecklistItem::new("Radar on");

        item.set_checked(true, at);
        assert_eq!(item.timestamp.as_deref(), Some("2026-03-01 08:30"));
        item.validate().unwrap();

        item.set_checked(false, at);
        assert_eq!(item.timestamp, None);
        item.validate().unwrap();
    }

    #[test]
    fn toggle_flips_state_and_returns_it() {
        let at = Local.with_ymd_and_hms(2026, 3, 1, 21, 5, 0).unwrap();
        let mut item = ChecklistItem::new("Navigation lights on");

        assert!(item.toggle(at));
        assert_eq!(item.timestamp.as_deref(), Some("2026-03-01 21:05"));
        assert!(!item.toggle(at));
        assert!(!item.is_checked);
        assert_eq!(item.timestamp, None);
    }

    #[test]
    fn attach_photo_rejects_fifth_photo() {
        let mut item = ChecklistItem::new("Hull inspection");
        for index in 0..MAX_PHOTOS_PER_ITEM {
            item.attach_photo(format!("p{index}.jpg")).unwrap();
        }

        let err = item.attach_photo("p4.jpg").unwrap_err();
        assert!(matches!(err, ValidationError::TooManyPhotos { .. }));
        assert_eq!(item.photo_filenames.len(), MAX_PHOTOS_PER_ITEM);
    }

    #[test]
    fn validate_rejects_orphan_timestamp() {
        let mut item = ChecklistItem::new("Lookout posted");
        item.timestamp = Some("2026-03-01 08:30".to_string());
        assert!(matches!(
            item.validate(),
            Err(ValidationError::TimestampWithoutCheck { .. })
        ));
    }
}
