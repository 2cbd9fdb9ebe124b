//! Note service: disciplinary notes written by teachers.
//!
//! Recording a note publishes [`EventKind::NoteRecorded`] with the parent's
//! address, so parents hear about it the same way they hear about absences.

use casebook_domain::error::{CasebookError, ValidationError};
use casebook_domain::event::{Event, EventKind};
use casebook_domain::id::{NoteId, StudentId};
use casebook_domain::note::{Note, NoteForm};
use casebook_domain::student::Student;
use casebook_domain::time::Date;
use casebook_domain::user::Role;

use crate::ports::{EventPublisher, NoteRepository, StudentRepository, UserRepository};

pub struct NoteService<S, P> {
    store: S,
    publisher: P,
}

impl<S, P> NoteService<S, P>
where
    S: StudentRepository + UserRepository + NoteRepository,
    P: EventPublisher,
{
    pub fn new(store: S, publisher: P) -> Self {
        Self { store, publisher }
    }

    /// Record a note about a student.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the student or the author is
    /// missing, [`ValidationError::Rule`] when the author is not a teacher,
    /// [`CasebookError::Validation`] for an invalid form, or a storage error.
    pub async fn insert(
        &self,
        student: StudentId,
        form: &NoteForm,
        today: Date,
    ) -> Result<Note, CasebookError> {
        let pupil = self.student(student).await?;
        let author = self
            .store
            .get_user(form.teacher_id)
            .await?
            .ok_or_else(|| form.teacher_id.not_found())?;
        if !author.has_role(Role::Teacher) {
            tracing::warn!(user_id = %author.id, "note rejected, author is not a teacher");
            return Err(ValidationError::Rule("only teachers can write notes").into());
        }
        let note = Note::new(student, form, today)?;

        let note = self.store.create_note(note).await?;
        self.publisher
            .publish(Event::new(
                EventKind::NoteRecorded,
                Some(note.id.as_uuid()),
                serde_json::json!({
                    "student_id": student,
                    "student_name": pupil.full_name,
                    "parent_email": pupil.parent_email,
                    "teacher_id": note.teacher_id,
                    "date": note.date,
                    "description": note.description,
                }),
            ))
            .await?;
        tracing::info!(note_id = %note.id, student_id = %student, "note recorded");
        Ok(note)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn get(&self, id: NoteId) -> Result<Note, CasebookError> {
        self.store
            .get_note(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }

    /// Notes of a student, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the student is missing, or a
    /// storage error.
    pub async fn list_for_student(&self, student: StudentId) -> Result<Vec<Note>, CasebookError> {
        self.student(student).await?;
        self.store.notes_for_student(student).await
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`], [`CasebookError::Validation`]
    /// for an invalid description, or a storage error.
    pub async fn edit(&self, id: NoteId, description: &str) -> Result<Note, CasebookError> {
        let mut note = self.get(id).await?;
        note.edit(description)?;
        let note = self.store.update_note(note).await?;
        tracing::info!(note_id = %id, "note edited");
        Ok(note)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn delete(&self, id: NoteId) -> Result<(), CasebookError> {
        self.get(id).await?;
        self.store.delete_note(id).await?;
        tracing::info!(note_id = %id, "note deleted");
        Ok(())
    }

    async fn student(&self, id: StudentId) -> Result<Student, CasebookError> {
        self.store
            .get_student(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }
}
