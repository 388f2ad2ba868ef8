//! Core data model and persistence for the ship pilot checklist app.
//! This crate is the single source of truth for checklist state rules.

pub mod builtin;
pub mod db;
pub mod logging;
pub mod model;
pub mod photo;
pub mod repo;
pub mod service;

pub use builtin::{built_in_checklists, find_template, titles_by_category};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::archive::ArchivedChecklist;
pub use model::checklist::{
    ChecklistCategory, ChecklistId, ChecklistInfo, ChecklistItem, ChecklistSection,
    CustomChecklist, ValidationError, MAX_PHOTOS_PER_ITEM, TIMESTAMP_FORMAT,
};
pub use model::contact::{Contact, ContactCategory};
pub use model::favorite::{
    recompute_default_category, FavoriteCategory, FavoriteEntry, DEFAULT_FAVORITES_CATEGORY,
};
pub use photo::PhotoStorage;
pub use repo::archive_repo::ArchiveStore;
pub use repo::builtin_state_repo::BuiltInStateStore;
pub use repo::contact_repo::ContactStore;
pub use repo::custom_repo::CustomChecklistStore;
pub use repo::favorite_repo::{BuiltInFavoritesStore, FavoriteCategoryError, FavoriteCategoryStore};
pub use repo::kv_store::{KvStore, RepoError, RepoResult, SqliteKvStore};
pub use repo::notes_repo::{ChecklistNotesStore, ChecklistRef};
pub use repo::quick_note_repo::{PositionedNote, QuickNoteStore};
pub use service::checklist_service::{
    build_report, ChecklistReport, ChecklistService, ChecklistServiceError, ReportMetadata,
    REPORT_PHOTOS_PER_ITEM,
};
pub use service::exchange::{ExchangeError, ExchangeResult};
pub use service::favorites_service::FavoritesService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
