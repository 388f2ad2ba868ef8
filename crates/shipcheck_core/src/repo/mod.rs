//! Per-family persistence stores over a key-value substrate.
//!
//! # Responsibility
//! - One store per checklist family, each constructed over a shared
//!   `KvStore` and passed to whatever needs it.
//! - Keep key names and JSON shapes compatible with existing device data.
//!
//! # Invariants
//! - Store APIs never surface persistence errors: reads fall back to the
//!   default value and writes that fail are logged and dropped.
//! - Identity misses on update/delete are silent no-ops.

pub mod archive_repo;
pub mod builtin_state_repo;
pub mod contact_repo;
pub mod custom_repo;
pub mod favorite_repo;
pub mod kv_store;
pub mod notes_repo;
pub mod quick_note_repo;
