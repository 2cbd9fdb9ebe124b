//! Curriculum: the teachings a school offers and the study addresses that
//! group them.

use serde::{Deserialize, Serialize};

use crate::error::CasebookError;
use crate::id::{AddressId, TeachingId};
use crate::validation::Checks;

/// Longest teaching or address name, in characters.
pub const NAME_MAX: usize = 50;

/// A subject taught at the school, e.g. "Mathematics".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teaching {
    pub id: TeachingId,
    pub name: String,
}

impl Teaching {
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] when the name is blank or too long.
    pub fn new(name: &str) -> Result<Self, CasebookError> {
        let name = name.trim();
        check_name(name)?;
        Ok(Self {
            id: TeachingId::new(),
            name: name.to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] when the name is blank or too long.
    pub fn rename(&mut self, name: &str) -> Result<(), CasebookError> {
        let name = name.trim();
        check_name(name)?;
        self.name = name.to_string();
        Ok(())
    }

    /// Key under which teaching names are unique.
    #[must_use]
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

/// A study track, e.g. "Scientific high school", offering a set of teachings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub name: String,
    /// In the order they were assigned.
    pub teachings: Vec<TeachingId>,
}

impl Address {
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] when the name is blank or too long.
    pub fn new(name: &str) -> Result<Self, CasebookError> {
        let name = name.trim();
        check_name(name)?;
        Ok(Self {
            id: AddressId::new(),
            name: name.to_string(),
            teachings: Vec::new(),
        })
    }

    #[must_use]
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }

    #[must_use]
    pub fn offers(&self, teaching: TeachingId) -> bool {
        self.teachings.contains(&teaching)
    }
}

/// Trimmed lowercase form of a teaching or address name.
#[must_use]
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn check_name(name: &str) -> Result<(), CasebookError> {
    let mut checks = Checks::new();
    if checks.required("name", name) {
        checks.length("name", name, 1, NAME_MAX);
    }
    Ok(checks.finish()?)
}
