//! Archive store: append-only log of frozen checklist snapshots.
//!
//! # Invariants
//! - Entries are never updated; changing one means delete then add.
//! - Invalid snapshots are refused on `add`. Invalid entries found on read
//!   are skipped one by one; the rest of the archive still loads.
//! - `delete` removes every entry with the same identity (title for
//!   built-in snapshots, id for custom ones); variants never match each
//!   other.

use crate::model::archive::ArchivedChecklist;
use crate::repo::kv_store::{keys, load_json, remove_key, store_json, KvStore};
use log::{info, warn};

pub struct ArchiveStore<'kv, K: KvStore> {
    kv: &'kv K,
}

impl<'kv, K: KvStore> ArchiveStore<'kv, K> {
    pub fn new(kv: &'kv K) -> Self {
        Self { kv }
    }

    /// Returns archived entries in the order they were added.
    pub fn load_all(&self) -> Vec<ArchivedChecklist> {
        let entries: Vec<ArchivedChecklist> =
            load_json(self.kv, keys::ARCHIVED_CHECKLISTS).unwrap_or_default();
        entries
            .into_iter()
            .filter(|entry| match entry.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!(
                        "event=archive_load module=repo status=fallback error_code=invalid_record error={err}"
                    );
                    false
                }
            })
            .collect()
    }

    pub fn add(&self, entry: &ArchivedChecklist) {
        if let Err(err) = entry.validate() {
            warn!(
                "event=archive_add module=repo status=skipped error_code=invalid_record error={err}"
            );
            return;
        }
        let mut entries = self.load_all();
        entries.push(entry.clone());
        if store_json(self.kv, keys::ARCHIVED_CHECKLISTS, &entries) {
            info!(
                "event=archive_add module=repo status=ok count={}",
                entries.len()
            );
        }
    }

    pub fn delete(&self, entry: &ArchivedChecklist) {
        let mut entries = self.load_all();
        let before = entries.len();
        entries.retain(|existing| !existing.same_identity(entry));
        if entries.len() == before {
            return;
        }
        if store_json(self.kv, keys::ARCHIVED_CHECKLISTS, &entries) {
            info!(
                "event=archive_delete module=repo status=ok removed={}",
                before - entries.len()
            );
        }
    }

    pub fn clear_all(&self) {
        remove_key(self.kv, keys::ARCHIVED_CHECKLISTS);
        info!("event=archive_clear module=repo status=ok");
    }
}
