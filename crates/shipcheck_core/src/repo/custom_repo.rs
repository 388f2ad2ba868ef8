//! User-authored checklist store.
//!
//! # Responsibility
//! - Full CRUD over `CustomChecklist` records persisted as one ordered list
//!   under `customChecklists`.
//!
//! # Invariants
//! - The persisted list is in insertion order; `load_all` returns it
//!   reversed, so the most recently added record comes first.
//! - `update`/`delete` match by id and are silent no-ops on a miss.
//! - `save_all` trusts the caller's list verbatim, in persisted order.
//! - Records that fail validation are never written; a write carrying one
//!   is dropped whole and logged.
//! - An undecodable payload loads as an empty list. A decodable list loses
//!   only its invalid records, each logged.

use crate::model::checklist::{ChecklistId, CustomChecklist};
use crate::repo::kv_store::{keys, load_json, store_json, KvStore};
use log::{debug, info, warn};

pub struct CustomChecklistStore<'kv, K: KvStore> {
    kv: &'kv K,
}

impl<'kv, K: KvStore> CustomChecklistStore<'kv, K> {
    pub fn new(kv: &'kv K) -> Self {
        Self { kv }
    }

    /// Returns all records, most recently added first.
    pub fn load_all(&self) -> Vec<CustomChecklist> {
        let mut records = self.load_insertion_order();
        records.reverse();
        records
    }

    /// Finds one record by id.
    pub fn get(&self, id: ChecklistId) -> Option<CustomChecklist> {
        self.load_insertion_order().into_iter().find(|record| record.id == id)
    }

    /// Appends one record.
    pub fn add(&self, checklist: &CustomChecklist) {
        if !is_writable(checklist, "custom_add") {
            return;
        }
        let mut records = self.load_insertion_order();
        records.push(checklist.clone());
        if self.persist(&records) {
            info!(
                "event=custom_add module=repo status=ok id={} count={}",
                checklist.id,
                records.len()
            );
        }
    }

    /// Replaces the record with the same id in place.
    pub fn update(&self, checklist: &CustomChecklist) {
        if !is_writable(checklist, "custom_update") {
            return;
        }
        let mut records = self.load_insertion_order();
        let Some(slot) = records.iter_mut().find(|record| record.id == checklist.id) else {
            debug!(
                "event=custom_update module=repo status=skipped reason=not_found id={}",
                checklist.id
            );
            return;
        };
        *slot = checklist.clone();
        if self.persist(&records) {
            info!("event=custom_update module=repo status=ok id={}", checklist.id);
        }
    }

    /// Removes the record with the same id.
    pub fn delete(&self, checklist: &CustomChecklist) {
        self.delete_by_id(checklist.id);
    }

    pub fn delete_by_id(&self, id: ChecklistId) {
        let mut records = self.load_insertion_order();
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            debug!("event=custom_delete module=repo status=skipped reason=not_found id={id}");
            return;
        }
        if self.persist(&records) {
            info!("event=custom_delete module=repo status=ok id={id}");
        }
    }

    /// Overwrites the whole collection verbatim.
    ///
    /// `checklists` is taken in persisted (insertion) order, so `load_all`
    /// afterwards returns it reversed. Callers must hold the complete list.
    pub fn save_all(&self, checklists: &[CustomChecklist]) {
        if !checklists
            .iter()
            .all(|record| is_writable(record, "custom_save_all"))
        {
            return;
        }
        if self.persist(checklists) {
            info!(
                "event=custom_save_all module=repo status=ok count={}",
                checklists.len()
            );
        }
    }

    /// Returns all records in persisted (insertion) order.
    pub fn load_insertion_order(&self) -> Vec<CustomChecklist> {
        let records: Vec<CustomChecklist> =
            load_json(self.kv, keys::CUSTOM_CHECKLISTS).unwrap_or_default();
        records
            .into_iter()
            .filter(|record| match record.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!(
                        "event=custom_load module=repo status=fallback error_code=invalid_record id={} error={err}",
                        record.id
                    );
                    false
                }
            })
            .collect()
    }

    fn persist(&self, records: &[CustomChecklist]) -> bool {
        store_json(self.kv, keys::CUSTOM_CHECKLISTS, records)
    }
}

fn is_writable(checklist: &CustomChecklist, event: &str) -> bool {
    match checklist.validate() {
        Ok(()) => true,
        Err(err) => {
            warn!(
                "event={event} module=repo status=skipped error_code=invalid_record id={} error={err}",
                checklist.id
            );
            false
        }
    }
}
