//! Favorites view use-case.
//!
//! # Invariants
//! - The default category is recomputed from the durable favorite sources
//!   (`BuiltInFavorites` title set, custom `is_favorite` flags) on every
//!   load. Whatever was stored for it before is discarded.
//! - User categories keep their stored entries and order; they are not
//!   recomputed. A user category left with no entries is dropped.

use crate::model::checklist::ChecklistId;
use crate::model::favorite::{recompute_default_category, FavoriteCategory};
use crate::repo::custom_repo::CustomChecklistStore;
use crate::repo::favorite_repo::{BuiltInFavoritesStore, FavoriteCategoryStore};
use crate::repo::kv_store::KvStore;
use log::{debug, info};

pub struct FavoritesService<'kv, K: KvStore> {
    builtin_favorites: BuiltInFavoritesStore<'kv, K>,
    customs: CustomChecklistStore<'kv, K>,
    categories: FavoriteCategoryStore<'kv, K>,
}

impl<'kv, K: KvStore> FavoritesService<'kv, K> {
    pub fn new(kv: &'kv K) -> Self {
        Self {
            builtin_favorites: BuiltInFavoritesStore::new(kv),
            customs: CustomChecklistStore::new(kv),
            categories: FavoriteCategoryStore::new(kv),
        }
    }

    /// Builds the categorized favorites view.
    ///
    /// Returns the recomputed default category first, followed by the
    /// non-empty user categories in stored order. Dropped empty categories
    /// are persisted.
    pub fn load_view(&self) -> Vec<FavoriteCategory> {
        let stored = self.categories.load_all();
        let stored_count = stored.len();
        let user_categories: Vec<FavoriteCategory> = stored
            .into_iter()
            .filter(|category| !category.is_default() && !category.entries.is_empty())
            .collect();

        // load_all always yields the default category plus the user ones.
        if user_categories.len() + 1 != stored_count {
            info!(
                "event=favorites_prune module=service status=ok dropped={}",
                stored_count - 1 - user_categories.len()
            );
            self.categories.save_all(&user_categories);
        }

        let default_category = recompute_default_category(
            &self.builtin_favorites.favorited_titles(),
            &self.customs.load_all(),
        );
        debug!(
            "event=favorites_view module=service status=ok default_entries={} categories={}",
            default_category.entries.len(),
            user_categories.len()
        );

        let mut view = Vec::with_capacity(user_categories.len() + 1);
        view.push(default_category);
        view.extend(user_categories);
        view
    }

    /// Flips a built-in favorite and returns the new state.
    pub fn toggle_builtin(&self, title: &str) -> bool {
        self.builtin_favorites.toggle_favorite(title)
    }

    /// Flips the `is_favorite` flag of a custom checklist.
    ///
    /// Returns the new state, or `None` when no record has this id.
    pub fn toggle_custom(&self, id: ChecklistId) -> Option<bool> {
        let mut checklist = self.customs.get(id)?;
        checklist.is_favorite = !checklist.is_favorite;
        self.customs.update(&checklist);
        Some(checklist.is_favorite)
    }
}
