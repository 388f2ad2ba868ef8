//! Domain model for checklists, archives, favorites and contacts.
//!
//! # Responsibility
//! - Define the value types every screen reads and writes.
//! - Keep wire field names stable for persisted and exchanged data.
//!
//! # Invariants
//! - Built-in checklists are identified by title, custom ones by UUID.
//! - Item fill-in state obeys the check/timestamp and photo-limit rules in
//!   `checklist`.

pub mod archive;
pub mod checklist;
pub mod contact;
pub mod favorite;
