//! Contact directory persistence (whole-collection replace).

use crate::model::contact::ContactCategory;
use crate::repo::kv_store::{keys, load_json, store_json, KvStore};
use log::info;

pub struct ContactStore<'kv, K: KvStore> {
    kv: &'kv K,
}

impl<'kv, K: KvStore> ContactStore<'kv, K> {
    pub fn new(kv: &'kv K) -> Self {
        Self { kv }
    }

    pub fn load_all(&self) -> Vec<ContactCategory> {
        load_json(self.kv, keys::CONTACT_CATEGORIES).unwrap_or_default()
    }

    pub fn save_all(&self, categories: &[ContactCategory]) {
        if store_json(self.kv, keys::CONTACT_CATEGORIES, categories) {
            info!(
                "event=contacts_save module=repo status=ok categories={}",
                categories.len()
            );
        }
    }
}
