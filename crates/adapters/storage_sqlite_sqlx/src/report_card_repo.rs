//! `SQLite` implementation of [`ReportCardRepository`].
//!
//! Grades are stored as a JSON array; a card is unique per student,
//! academic year and term.

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use casebook_app::ports::ReportCardRepository;
use casebook_domain::error::CasebookError;
use casebook_domain::id::{AcademicYearId, StudentId};
use casebook_domain::report_card::{ReportCard, SubjectGrade, Term};

use crate::error::StorageError;
use crate::store::{SqliteStore, decode_err, parse_id, parse_timestamp};

struct Wrapper(ReportCard);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let student_id: String = row.try_get("student_id")?;
        let academic_year_id: String = row.try_get("academic_year_id")?;
        let term: String = row.try_get("term")?;
        let grades: String = row.try_get("grades")?;
        let published_at: String = row.try_get("published_at")?;

        let grades: Vec<SubjectGrade> = serde_json::from_str(&grades).map_err(decode_err)?;

        Ok(Self(ReportCard {
            id: parse_id(&id)?,
            student_id: parse_id(&student_id)?,
            academic_year_id: parse_id(&academic_year_id)?,
            term: Term::from_str(&term).map_err(decode_err)?,
            grades,
            teacher_comment: row.try_get("teacher_comment")?,
            published_at: parse_timestamp(&published_at)?,
        }))
    }
}

const DELETE_SAME_TERM: &str =
    "DELETE FROM report_cards WHERE student_id = ? AND academic_year_id = ? AND term = ?";
const INSERT: &str = r"
    INSERT INTO report_cards (id, student_id, academic_year_id, term, grades, teacher_comment, published_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";
const SELECT_ONE: &str =
    "SELECT * FROM report_cards WHERE student_id = ? AND academic_year_id = ? AND term = ?";
const SELECT_OF_STUDENT: &str = r"
    SELECT c.* FROM report_cards c
    JOIN academic_years y ON y.id = c.academic_year_id
    WHERE c.student_id = ?
    ORDER BY y.start_year, c.term
";

impl ReportCardRepository for SqliteStore {
    async fn upsert_report_card(&self, card: ReportCard) -> Result<ReportCard, CasebookError> {
        let grades = serde_json::to_string(&card.grades).map_err(StorageError::from)?;

        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
        sqlx::query(DELETE_SAME_TERM)
            .bind(card.student_id.to_string())
            .bind(card.academic_year_id.to_string())
            .bind(card.term.as_str())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        sqlx::query(INSERT)
            .bind(card.id.to_string())
            .bind(card.student_id.to_string())
            .bind(card.academic_year_id.to_string())
            .bind(card.term.as_str())
            .bind(grades)
            .bind(&card.teacher_comment)
            .bind(card.published_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        tx.commit().await.map_err(StorageError::from)?;

        Ok(card)
    }

    async fn find_report_card(
        &self,
        student: StudentId,
        year: AcademicYearId,
        term: Term,
    ) -> Result<Option<ReportCard>, CasebookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_ONE)
            .bind(student.to_string())
            .bind(year.to_string())
            .bind(term.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn report_cards_for_student(&self, student: StudentId) -> Result<Vec<ReportCard>, CasebookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_OF_STUDENT)
            .bind(student.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
