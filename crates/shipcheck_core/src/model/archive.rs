//! Archived checklist snapshots.
//!
//! # Invariants
//! - An archive is a frozen copy; it never references the live record.
//! - Identity for deletion is the title for built-in snapshots and the id
//!   for custom snapshots. Entries of different variants never match.
//! - The serialized `type` discriminator (`builtIn` / `custom`) is part of
//!   the persisted compatibility surface.

use crate::model::checklist::{ChecklistInfo, CustomChecklist, ValidationError};
use serde::{Deserialize, Serialize};

/// Frozen copy of either checklist family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "checklist")]
pub enum ArchivedChecklist {
    #[serde(rename = "builtIn")]
    BuiltIn(ChecklistInfo),
    #[serde(rename = "custom")]
    Custom(CustomChecklist),
}

impl ArchivedChecklist {
    /// Returns whether both entries denote the same archived checklist.
    pub fn same_identity(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::BuiltIn(left), Self::BuiltIn(right)) => left.title == right.title,
            (Self::Custom(left), Self::Custom(right)) => left.id == right.id,
            _ => false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::BuiltIn(info) => info.validate(),
            Self::Custom(custom) => custom.validate(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::BuiltIn(info) => info.title.as_str(),
            Self::Custom(custom) => custom.title.as_str(),
        }
    }
}
