//! Note: a disciplinary remark a teacher writes in a student's record.
//!
//! Parents are told about every new note, the same way they hear about
//! absences.

use serde::{Deserialize, Serialize};

use crate::error::{CasebookError, ValidationError};
use crate::id::{NoteId, StudentId, UserId};
use crate::time::{Date, Timestamp, now};
use crate::validation::Checks;

/// Longest accepted note description, in characters.
pub const DESCRIPTION_MAX: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub student_id: StudentId,
    /// The teacher who wrote the note.
    pub teacher_id: UserId,
    /// Day the behaviour happened.
    pub date: Date,
    pub description: String,
    pub created_at: Timestamp,
}

/// Data entered by a teacher for a new note.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteForm {
    pub teacher_id: UserId,
    pub date: Date,
    pub description: String,
}

impl Note {
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] when the date is after `today`
    /// or the description is blank or too long.
    pub fn new(student_id: StudentId, form: &NoteForm, today: Date) -> Result<Self, CasebookError> {
        let description = form.description.trim();
        let mut checks = Checks::new();
        checks.ensure(
            form.date <= today,
            ValidationError::Rule("note date cannot be in the future"),
        );
        check_description(&mut checks, description);
        checks.finish()?;

        Ok(Self {
            id: NoteId::new(),
            student_id,
            teacher_id: form.teacher_id,
            date: form.date,
            description: description.to_string(),
            created_at: now(),
        })
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] when the description is blank
    /// or too long.
    pub fn edit(&mut self, description: &str) -> Result<(), CasebookError> {
        let description = description.trim();
        let mut checks = Checks::new();
        check_description(&mut checks, description);
        checks.finish()?;
        self.description = description.to_string();
        Ok(())
    }
}

fn check_description(checks: &mut Checks, description: &str) {
    if checks.required("description", description) {
        checks.length("description", description, 1, DESCRIPTION_MAX);
    }
}
