//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into screen-level operations.
//! - Keep FFI/UI callers decoupled from key layout and storage details.

pub mod checklist_service;
pub mod exchange;
pub mod favorites_service;
