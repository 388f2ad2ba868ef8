//! Contact directory model used for emergency communication exports.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    /// Free-form role, e.g. "VTS" or "Agent".
    #[serde(default)]
    pub role: Option<String>,
}

impl Contact {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            role: None,
        }
    }
}

/// Named group of contacts; the whole list is persisted and exchanged as one
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCategory {
    pub name: String,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}
