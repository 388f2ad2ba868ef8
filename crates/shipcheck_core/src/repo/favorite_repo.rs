//! Favorite sources of truth and category persistence.
//!
//! # Responsibility
//! - `BuiltInFavoritesStore`: the durable set of favorited built-in titles.
//! - `FavoriteCategoryStore`: user-named favorite categories and their
//!   manually ordered entries.
//!
//! # Invariants
//! - The default category is always present, always first, and is stored
//!   with no entries; its membership is recomputed on every read by
//!   `FavoritesService`.
//! - Category names are unique and non-blank.

use crate::model::favorite::{FavoriteCategory, FavoriteEntry, DEFAULT_FAVORITES_CATEGORY};
use crate::repo::kv_store::{keys, load_json, store_json, KvStore};
use log::info;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Durable favorite flag for built-in checklists, keyed by title.
pub struct BuiltInFavoritesStore<'kv, K: KvStore> {
    kv: &'kv K,
}

impl<'kv, K: KvStore> BuiltInFavoritesStore<'kv, K> {
    pub fn new(kv: &'kv K) -> Self {
        Self { kv }
    }

    pub fn favorited_titles(&self) -> BTreeSet<String> {
        load_json::<Vec<String>>(self.kv, keys::BUILT_IN_FAVORITES)
            .unwrap_or_default()
            .into_iter()
            .collect()
    }

    pub fn is_favorite(&self, title: &str) -> bool {
        self.favorited_titles().contains(title)
    }

    /// Flips membership of `title` and returns the new state.
    pub fn toggle_favorite(&self, title: &str) -> bool {
        let mut titles = self.favorited_titles();
        let now_favorite = if titles.remove(title) {
            false
        } else {
            titles.insert(title.to_string());
            true
        };
        let stored: Vec<&String> = titles.iter().collect();
        if store_json(self.kv, keys::BUILT_IN_FAVORITES, &stored) {
            info!(
                "event=favorite_toggle module=repo status=ok kind=builtin favorite={now_favorite}"
            );
        }
        now_favorite
    }
}

/// Category management errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteCategoryError {
    EmptyName,
    DuplicateName(String),
    /// The default category cannot be renamed, deleted or edited by hand.
    DefaultCategoryLocked,
    CategoryNotFound(String),
}

impl Display for FavoriteCategoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "category name cannot be empty"),
            Self::DuplicateName(name) => write!(f, "category already exists: {name}"),
            Self::DefaultCategoryLocked => write!(
                f,
                "category `{DEFAULT_FAVORITES_CATEGORY}` is managed automatically"
            ),
            Self::CategoryNotFound(name) => write!(f, "category not found: {name}"),
        }
    }
}

impl Error for FavoriteCategoryError {}

pub struct FavoriteCategoryStore<'kv, K: KvStore> {
    kv: &'kv K,
}

impl<'kv, K: KvStore> FavoriteCategoryStore<'kv, K> {
    pub fn new(kv: &'kv K) -> Self {
        Self { kv }
    }

    /// Returns stored categories with the (empty) default category first.
    pub fn load_all(&self) -> Vec<FavoriteCategory> {
        let stored: Vec<FavoriteCategory> =
            load_json(self.kv, keys::FAVORITES_CATEGORIES).unwrap_or_default();
        normalize(stored)
    }

    /// Persists the given categories; default-category entries are dropped.
    pub fn save_all(&self, categories: &[FavoriteCategory]) {
        let normalized = normalize(categories.to_vec());
        if store_json(self.kv, keys::FAVORITES_CATEGORIES, &normalized) {
            info!(
                "event=favorite_categories_save module=repo status=ok count={}",
                normalized.len()
            );
        }
    }

    /// Creates a user category holding `first_entry`.
    ///
    /// Categories are created around an entry because empty user
    /// categories are dropped by the favorites view.
    pub fn create_category(
        &self,
        name: &str,
        first_entry: &FavoriteEntry,
    ) -> Result<(), FavoriteCategoryError> {
        let name = validate_name(name)?;
        let mut categories = self.load_all();
        if categories.iter().any(|category| category.name == name) {
            return Err(FavoriteCategoryError::DuplicateName(name));
        }
        let mut category = FavoriteCategory::new(name);
        category.entries.push(first_entry.clone());
        categories.push(category);
        self.save_all(&categories);
        Ok(())
    }

    pub fn rename_category(&self, from: &str, to: &str) -> Result<(), FavoriteCategoryError> {
        ensure_not_default(from)?;
        let to = validate_name(to)?;
        let mut categories = self.load_all();
        if categories.iter().any(|category| category.name == to) {
            return Err(FavoriteCategoryError::DuplicateName(to));
        }
        find_mut(&mut categories, from)?.name = to;
        self.save_all(&categories);
        Ok(())
    }

    pub fn delete_category(&self, name: &str) -> Result<(), FavoriteCategoryError> {
        ensure_not_default(name)?;
        let mut categories = self.load_all();
        let before = categories.len();
        categories.retain(|category| category.name != name);
        if categories.len() == before {
            return Err(FavoriteCategoryError::CategoryNotFound(name.to_string()));
        }
        self.save_all(&categories);
        Ok(())
    }

    /// Inserts `entry` into a user category at `index` (or the end).
    ///
    /// An entry already in the category is moved to the new position.
    pub fn add_entry(
        &self,
        category_name: &str,
        entry: &FavoriteEntry,
        index: Option<usize>,
    ) -> Result<(), FavoriteCategoryError> {
        ensure_not_default(category_name)?;
        let mut categories = self.load_all();
        let category = find_mut(&mut categories, category_name)?;
        category.entries.retain(|existing| existing != entry);
        let position = index
            .unwrap_or(category.entries.len())
            .min(category.entries.len());
        category.entries.insert(position, entry.clone());
        self.save_all(&categories);
        Ok(())
    }

    pub fn remove_entry(
        &self,
        category_name: &str,
        entry: &FavoriteEntry,
    ) -> Result<(), FavoriteCategoryError> {
        ensure_not_default(category_name)?;
        let mut categories = self.load_all();
        find_mut(&mut categories, category_name)?
            .entries
            .retain(|existing| existing != entry);
        self.save_all(&categories);
        Ok(())
    }

    /// Removes `entry` from every user category.
    pub fn remove_entry_everywhere(&self, entry: &FavoriteEntry) {
        let mut categories = self.load_all();
        let mut changed = false;
        for category in categories.iter_mut() {
            let before = category.entries.len();
            category.entries.retain(|existing| existing != entry);
            changed |= before != category.entries.len();
        }
        if changed {
            self.save_all(&categories);
        }
    }
}

/// Puts one empty default category first and drops duplicates by name.
fn normalize(categories: Vec<FavoriteCategory>) -> Vec<FavoriteCategory> {
    let mut seen = BTreeSet::new();
    let mut normalized = vec![FavoriteCategory::new(DEFAULT_FAVORITES_CATEGORY)];
    seen.insert(DEFAULT_FAVORITES_CATEGORY.to_string());
    for category in categories {
        if seen.insert(category.name.clone()) {
            normalized.push(category);
        }
    }
    normalized
}

fn validate_name(name: &str) -> Result<String, FavoriteCategoryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FavoriteCategoryError::EmptyName);
    }
    ensure_not_default(trimmed)?;
    Ok(trimmed.to_string())
}

fn ensure_not_default(name: &str) -> Result<(), FavoriteCategoryError> {
    if name == DEFAULT_FAVORITES_CATEGORY {
        Err(FavoriteCategoryError::DefaultCategoryLocked)
    } else {
        Ok(())
    }
}

fn find_mut<'a>(
    categories: &'a mut [FavoriteCategory],
    name: &str,
) -> Result<&'a mut FavoriteCategory, FavoriteCategoryError> {
    categories
        .iter_mut()
        .find(|category| category.name == name)
        .ok_or_else(|| FavoriteCategoryError::CategoryNotFound(name.to_string()))
}
