//! Favorite entries and categories.
//!
//! The default category is a projection: its entries are recomputed from
//! the built-in favorite title set and the custom `is_favorite` flags on
//! every read, and are never the source of truth.

use crate::model::checklist::{ChecklistId, CustomChecklist};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Name of the recomputed default category.
pub const DEFAULT_FAVORITES_CATEGORY: &str = "Favorites";

/// Reference to one favorited checklist.
///
/// `id` is the title for built-ins and the UUID string for customs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub id: String,
    pub is_custom: bool,
}

impl FavoriteEntry {
    pub fn built_in(title: impl Into<String>) -> Self {
        Self {
            id: title.into(),
            is_custom: false,
        }
    }

    pub fn custom(id: ChecklistId) -> Self {
        Self {
            id: id.to_string(),
            is_custom: true,
        }
    }
}

/// Named, ordered group of favorite entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteCategory {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<FavoriteEntry>,
}

impl FavoriteCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_FAVORITES_CATEGORY
    }

    pub fn contains(&self, entry: &FavoriteEntry) -> bool {
        self.entries.contains(entry)
    }
}

/// Rebuilds the default category from the durable favorite sources.
///
/// Built-in titles come first in title order, followed by favorited custom
/// checklists in the order given.
pub fn recompute_default_category(
    favorite_titles: &BTreeSet<String>,
    customs: &[CustomChecklist],
) -> FavoriteCategory {
    let entries = favorite_titles
        .iter()
        .map(|title| FavoriteEntry::built_in(title.as_str()))
        .chain(
            customs
                .iter()
                .filter(|checklist| checklist.is_favorite)
                .map(|checklist| FavoriteEntry::custom(checklist.id)),
        )
        .collect();

    FavoriteCategory {
        name: DEFAULT_FAVORITES_CATEGORY.to_string(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::{recompute_default_category, FavoriteEntry, DEFAULT_FAVORITES_CATEGORY};
    use crate::model::checklist::CustomChecklist;
    use std::collections::BTreeSet;

    #[test]
    fn recompute_includes_only_flagged_customs() {
        let titles = BTreeSet::from(["Man Overboard".to_string()]);
        let mut favored = CustomChecklist::new("Harbor entry");
        favored.is_favorite = true;
        let plain = CustomChecklist::new("Bunkering");

        let category = recompute_default_category(&titles, &[plain, favored.clone()]);
        assert_eq!(category.name, DEFAULT_FAVORITES_CATEGORY);
        assert_eq!(
            category.entries,
            vec![
                FavoriteEntry::built_in("Man Overboard"),
                FavoriteEntry::custom(favored.id),
            ]
        );
    }
}
