//! Built-in checklist fill-in overlay store.
//!
//! # Responsibility
//! - Persist check state, timestamps and photo references on top of the
//!   static built-in templates, one key per title.
//!
//! # Invariants
//! - Structure always comes from the template; the overlay only contributes
//!   item state, matched by position and item title.
//! - Quick notes are never stored in the overlay (see `quick_note_repo`).
//! - A missing, corrupt or invalid overlay yields the pristine template.

use crate::builtin::find_template;
use crate::model::checklist::{ChecklistInfo, ChecklistItem};
use crate::repo::kv_store::{keys, load_json, remove_key, store_json, KvStore};
use log::{debug, info, warn};

pub struct BuiltInStateStore<'kv, K: KvStore> {
    kv: &'kv K,
}

impl<'kv, K: KvStore> BuiltInStateStore<'kv, K> {
    pub fn new(kv: &'kv K) -> Self {
        Self { kv }
    }

    /// Loads a catalog template by title merged with its saved overlay.
    ///
    /// Returns `None` when the title is not part of the built-in catalog.
    pub fn load(&self, title: &str) -> Option<ChecklistInfo> {
        find_template(title).map(|template| self.load_with_template(template))
    }

    /// Merges the saved overlay for `template.title` into `template`.
    pub fn load_with_template(&self, mut template: ChecklistInfo) -> ChecklistInfo {
        let key = keys::builtin_overlay(&template.title);
        let Some(overlay) = load_json::<ChecklistInfo>(self.kv, &key) else {
            debug!("event=builtin_load module=repo status=ok overlay=none key={key}");
            return template;
        };

        if let Err(err) = overlay.validate() {
            warn!(
                "event=builtin_load module=repo status=fallback key={key} error_code=invalid_overlay error={err}"
            );
            return template;
        }

        merge_overlay(&mut template, &overlay);
        debug!("event=builtin_load module=repo status=ok overlay=merged key={key}");
        template
    }

    /// Overwrites the overlay for `checklist.title` with its item state.
    pub fn save(&self, checklist: &ChecklistInfo) {
        let key = keys::builtin_overlay(&checklist.title);
        let mut overlay = checklist.clone();
        overlay
            .sections
            .iter_mut()
            .flat_map(|section| section.items.iter_mut())
            .for_each(|item| item.quick_note = None);

        if store_json(self.kv, &key, &overlay) {
            info!("event=builtin_save module=repo status=ok key={key}");
        }
    }

    /// Drops the overlay so future loads return the pristine template.
    ///
    /// Photo files referenced by the overlay are not touched; callers delete
    /// them first.
    pub fn clear(&self, title: &str) {
        let key = keys::builtin_overlay(title);
        remove_key(self.kv, &key);
        info!("event=builtin_clear module=repo status=ok key={key}");
    }

    /// Returns whether an overlay is currently stored for `title`.
    pub fn has_overlay(&self, title: &str) -> bool {
        self.kv
            .get(&keys::builtin_overlay(title))
            .map(|value| value.is_some())
            .unwrap_or(false)
    }
}

fn merge_overlay(template: &mut ChecklistInfo, overlay: &ChecklistInfo) {
    for (section_index, section) in template.sections.iter_mut().enumerate() {
        for (row_index, item) in section.items.iter_mut().enumerate() {
            if let Some(saved) = overlay.item(section_index, row_index) {
                if saved.title == item.title {
                    apply_state(item, saved);
                }
            }
        }
    }
}

fn apply_state(item: &mut ChecklistItem, saved: &ChecklistItem) {
    item.is_checked = saved.is_checked;
    item.timestamp = saved.timestamp.clone();
    item.photo_filenames = saved.photo_filenames.clone();
}
