//! Academic year: the school calendar unit classes and report cards belong to.

use serde::{Deserialize, Serialize};

use crate::error::CasebookError;
use crate::id::AcademicYearId;
use crate::validation::Checks;

pub const FIRST_YEAR: i32 = 2000;
pub const LAST_YEAR: i32 = 2100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicYear {
    pub id: AcademicYearId,
    /// Calendar year in which the academic year starts.
    pub start_year: i32,
}

impl AcademicYear {
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] when `start_year` is outside
    /// [`FIRST_YEAR`]..=[`LAST_YEAR`].
    pub fn new(start_year: i32) -> Result<Self, CasebookError> {
        let mut checks = Checks::new();
        checks.range(
            "start_year",
            start_year.into(),
            FIRST_YEAR.into(),
            LAST_YEAR.into(),
        );
        checks.finish()?;
        Ok(Self {
            id: AcademicYearId::new(),
            start_year,
        })
    }

    /// Human label such as `2024/2025`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}/{}", self.start_year, self.start_year + 1)
    }
}
