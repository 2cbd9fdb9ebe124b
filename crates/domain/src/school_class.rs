//! School class: a group of students within one academic year.

use serde::{Deserialize, Serialize};

use crate::error::CasebookError;
use crate::id::{AcademicYearId, ClassId};
use crate::validation::{CLASS_NAME, Checks};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: ClassId,
    pub academic_year_id: AcademicYearId,
    pub name: String,
}

impl SchoolClass {
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] when the name is blank or holds
    /// anything but letters, digits and spaces.
    pub fn new(academic_year_id: AcademicYearId, name: &str) -> Result<Self, CasebookError> {
        let name = name.trim();
        let mut checks = Checks::new();
        if checks.required("name", name) {
            checks.matches("name", name, &CLASS_NAME);
        }
        checks.finish()?;
        Ok(Self {
            id: ClassId::new(),
            academic_year_id,
            name: name.to_string(),
        })
    }
}
