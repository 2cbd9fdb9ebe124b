//! Tag: a search keyword an agency attaches to sites.

use serde::{Deserialize, Serialize};

use crate::error::CasebookError;
use crate::id::TagId;
use crate::validation::{Checks, TAG_NAME};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub description: String,
}

impl Tag {
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] listing every failed rule.
    pub fn new(name: &str, description: &str) -> Result<Self, CasebookError> {
        let tag = Self {
            id: TagId::new(),
            name: name.trim().to_string(),
            description: description.trim().to_string(),
        };
        tag.validate()?;
        Ok(tag)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] listing every failed rule.
    pub fn validate(&self) -> Result<(), CasebookError> {
        let mut checks = Checks::new();
        if checks.required("name", &self.name) {
            checks
                .length("name", &self.name, 1, 50)
                .matches("name", &self.name, &TAG_NAME);
        }
        if checks.required("description", &self.description) {
            checks.length("description", &self.description, 1, 200);
        }
        Ok(checks.finish()?)
    }

    /// Key under which tag names are unique.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        normalize(&self.name)
    }
}

/// Trimmed lowercase form of a tag name.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
