//! Checklist-level notes (one free-text field per checklist).

use crate::model::checklist::ChecklistId;
use crate::repo::kv_store::{keys, load_text, remove_key, store_text, KvStore};
use log::info;

/// Identity of a checklist in either family.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChecklistRef {
    BuiltIn(String),
    Custom(ChecklistId),
}

impl ChecklistRef {
    fn notes_key(&self) -> String {
        match self {
            Self::BuiltIn(title) => keys::builtin_notes(title),
            Self::Custom(id) => keys::custom_notes(id),
        }
    }
}

pub struct ChecklistNotesStore<'kv, K: KvStore> {
    kv: &'kv K,
}

impl<'kv, K: KvStore> ChecklistNotesStore<'kv, K> {
    pub fn new(kv: &'kv K) -> Self {
        Self { kv }
    }

    pub fn get(&self, checklist: &ChecklistRef) -> Option<String> {
        load_text(self.kv, &checklist.notes_key())
    }

    /// Stores the notes text; `None` removes it.
    pub fn set(&self, checklist: &ChecklistRef, text: Option<&str>) {
        let key = checklist.notes_key();
        match text {
            Some(text) => {
                if store_text(self.kv, &key, text) {
                    info!("event=checklist_notes_set module=repo status=ok key={key}");
                }
            }
            None => remove_key(self.kv, &key),
        }
    }
}
