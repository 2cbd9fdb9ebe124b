//! `SQLite` implementation of [`NoteRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use casebook_app::ports::NoteRepository;
use casebook_domain::error::CasebookError;
use casebook_domain::id::{NoteId, StudentId};
use casebook_domain::note::Note;

use crate::error::StorageError;
use crate::store::{SqliteStore, parse_date, parse_id, parse_timestamp};

struct Wrapper(Note);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let student_id: String = row.try_get("student_id")?;
        let teacher_id: String = row.try_get("teacher_id")?;
        let date: String = row.try_get("date")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(Note {
            id: parse_id(&id)?,
            student_id: parse_id(&student_id)?,
            teacher_id: parse_id(&teacher_id)?,
            date: parse_date(&date)?,
            description: row.try_get("description")?,
            created_at: parse_timestamp(&created_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO notes (id, student_id, teacher_id, date, description, created_at)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM notes WHERE id = ?";
const SELECT_BY_STUDENT: &str =
    "SELECT * FROM notes WHERE student_id = ? ORDER BY date, created_at";
const UPDATE: &str = "UPDATE notes SET description = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM notes WHERE id = ?";

impl NoteRepository for SqliteStore {
    async fn create_note(&self, note: Note) -> Result<Note, CasebookError> {
        sqlx::query(INSERT)
            .bind(note.id.to_string())
            .bind(note.student_id.to_string())
            .bind(note.teacher_id.to_string())
            .bind(note.date.to_string())
            .bind(&note.description)
            .bind(note.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(note)
    }

    async fn get_note(&self, id: NoteId) -> Result<Option<Note>, CasebookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn notes_for_student(&self, student: StudentId) -> Result<Vec<Note>, CasebookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_STUDENT)
            .bind(student.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update_note(&self, note: Note) -> Result<Note, CasebookError> {
        sqlx::query(UPDATE)
            .bind(&note.description)
            .bind(note.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(note)
    }

    async fn delete_note(&self, id: NoteId) -> Result<(), CasebookError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
