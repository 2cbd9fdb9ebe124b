//! `SQLite` implementation of [`AttendanceRepository`] and
//! [`JustificationRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use casebook_app::ports::{AttendanceRepository, JustificationRepository};
use casebook_domain::attendance::{
    AttendanceKind, AttendanceRecord, Justification, RecordChange, RegisterDiff,
};
use casebook_domain::error::CasebookError;
use casebook_domain::id::{AttendanceRecordId, ClassId, JustificationId, StudentId};
use casebook_domain::time::Date;

use crate::error::StorageError;
use crate::store::{SqliteStore, parse_date, parse_id};

const ABSENCE: &str = "absence";
const DELAY: &str = "delay";

fn kind_columns(kind: AttendanceKind) -> (&'static str, Option<u16>) {
    match kind {
        AttendanceKind::Absence => (ABSENCE, None),
        AttendanceKind::Delay { minutes } => (DELAY, Some(minutes)),
    }
}

struct RecordWrapper(AttendanceRecord);

impl<'r> FromRow<'r, SqliteRow> for RecordWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let student_id: String = row.try_get("student_id")?;
        let class_id: String = row.try_get("class_id")?;
        let date: String = row.try_get("date")?;
        let kind: String = row.try_get("kind")?;
        let minutes: Option<u16> = row.try_get("minutes")?;

        let kind = match (kind.as_str(), minutes) {
            (ABSENCE, _) => AttendanceKind::Absence,
            (DELAY, Some(minutes)) => AttendanceKind::Delay { minutes },
            _ => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "kind".to_string(),
                    source: format!("unexpected attendance kind {kind:?}").into(),
                });
            }
        };

        Ok(Self(AttendanceRecord {
            id: parse_id(&id)?,
            student_id: parse_id(&student_id)?,
            class_id: parse_id(&class_id)?,
            date: parse_date(&date)?,
            kind,
        }))
    }
}

struct JustificationWrapper(Justification);

impl<'r> FromRow<'r, SqliteRow> for JustificationWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let record_id: String = row.try_get("record_id")?;
        let submitted_on: String = row.try_get("submitted_on")?;

        Ok(Self(Justification {
            id: parse_id(&id)?,
            record_id: parse_id(&record_id)?,
            reason: row.try_get("reason")?,
            submitted_on: parse_date(&submitted_on)?,
        }))
    }
}

const DELETE_RECORD: &str = "DELETE FROM attendance_records WHERE id = ?";
const UPDATE_RECORD_KIND: &str = "UPDATE attendance_records SET kind = ?, minutes = ? WHERE id = ?";
const DELETE_JUSTIFICATION_OF_RECORD: &str = "DELETE FROM justifications WHERE record_id = ?";
const INSERT_RECORD: &str = r"
    INSERT INTO attendance_records (id, student_id, class_id, date, kind, minutes)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_RECORD: &str = "SELECT * FROM attendance_records WHERE id = ?";
const SELECT_DAY: &str =
    "SELECT * FROM attendance_records WHERE class_id = ? AND date = ? ORDER BY student_id";
const SELECT_RECORDS_OF_STUDENT: &str =
    "SELECT * FROM attendance_records WHERE student_id = ? ORDER BY date";

const INSERT_JUSTIFICATION: &str = r"
    INSERT INTO justifications (id, record_id, reason, submitted_on) VALUES (?, ?, ?, ?)
";
const SELECT_JUSTIFICATION: &str = "SELECT * FROM justifications WHERE id = ?";
const SELECT_JUSTIFICATION_OF_RECORD: &str = "SELECT * FROM justifications WHERE record_id = ?";
const SELECT_JUSTIFICATIONS_OF_STUDENT: &str = r"
    SELECT j.* FROM justifications j
    JOIN attendance_records r ON r.id = j.record_id
    WHERE r.student_id = ?
    ORDER BY j.submitted_on, j.rowid
";
const UPDATE_JUSTIFICATION: &str = "UPDATE justifications SET reason = ? WHERE id = ?";
const DELETE_JUSTIFICATION: &str = "DELETE FROM justifications WHERE id = ?";

impl AttendanceRepository for SqliteStore {
    async fn merge_register(
        &self,
        class: ClassId,
        date: Date,
        records: Vec<AttendanceRecord>,
    ) -> Result<Vec<AttendanceRecord>, CasebookError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
        let stored: Vec<RecordWrapper> = sqlx::query_as(SELECT_DAY)
            .bind(class.to_string())
            .bind(date.to_string())
            .fetch_all(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        let stored: Vec<AttendanceRecord> = stored.into_iter().map(|w| w.0).collect();
        let diff = RegisterDiff::between(&stored, records);

        for id in &diff.removed {
            sqlx::query(DELETE_RECORD)
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }
        for id in diff.unjustifiable() {
            sqlx::query(DELETE_JUSTIFICATION_OF_RECORD)
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }
        for change in &diff.changes {
            match change {
                RecordChange::Insert(record) => {
                    let (kind, minutes) = kind_columns(record.kind);
                    sqlx::query(INSERT_RECORD)
                        .bind(record.id.to_string())
                        .bind(record.student_id.to_string())
                        .bind(record.class_id.to_string())
                        .bind(record.date.to_string())
                        .bind(kind)
                        .bind(minutes)
                        .execute(&mut *tx)
                        .await
                        .map_err(StorageError::from)?;
                }
                RecordChange::Update(record) => {
                    let (kind, minutes) = kind_columns(record.kind);
                    sqlx::query(UPDATE_RECORD_KIND)
                        .bind(kind)
                        .bind(minutes)
                        .bind(record.id.to_string())
                        .execute(&mut *tx)
                        .await
                        .map_err(StorageError::from)?;
                }
            }
        }
        tx.commit().await.map_err(StorageError::from)?;
        tracing::debug!(
            %class,
            %date,
            removed = diff.removed.len(),
            changed = diff.changes.len(),
            "register merged"
        );

        Ok(diff.into_changed())
    }

    async fn get_record(&self, id: AttendanceRecordId) -> Result<Option<AttendanceRecord>, CasebookError> {
        let row: Option<RecordWrapper> = sqlx::query_as(SELECT_RECORD)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn records_for_day(
        &self,
        class: ClassId,
        date: Date,
    ) -> Result<Vec<AttendanceRecord>, CasebookError> {
        let rows: Vec<RecordWrapper> = sqlx::query_as(SELECT_DAY)
            .bind(class.to_string())
            .bind(date.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn records_for_student(&self, student: StudentId) -> Result<Vec<AttendanceRecord>, CasebookError> {
        let rows: Vec<RecordWrapper> = sqlx::query_as(SELECT_RECORDS_OF_STUDENT)
            .bind(student.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

impl JustificationRepository for SqliteStore {
    async fn create_justification(&self, justification: Justification) -> Result<Justification, CasebookError> {
        sqlx::query(INSERT_JUSTIFICATION)
            .bind(justification.id.to_string())
            .bind(justification.record_id.to_string())
            .bind(&justification.reason)
            .bind(justification.submitted_on.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(justification)
    }

    async fn get_justification(&self, id: JustificationId) -> Result<Option<Justification>, CasebookError> {
        let row: Option<JustificationWrapper> = sqlx::query_as(SELECT_JUSTIFICATION)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn justification_for_record(
        &self,
        record: AttendanceRecordId,
    ) -> Result<Option<Justification>, CasebookError> {
        let row: Option<JustificationWrapper> = sqlx::query_as(SELECT_JUSTIFICATION_OF_RECORD)
            .bind(record.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn justifications_for_student(&self, student: StudentId) -> Result<Vec<Justification>, CasebookError> {
        let rows: Vec<JustificationWrapper> = sqlx::query_as(SELECT_JUSTIFICATIONS_OF_STUDENT)
            .bind(student.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update_justification(&self, justification: Justification) -> Result<Justification, CasebookError> {
        sqlx::query(UPDATE_JUSTIFICATION)
            .bind(&justification.reason)
            .bind(justification.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(justification)
    }

    async fn delete_justification(&self, id: JustificationId) -> Result<(), CasebookError> {
        sqlx::query(DELETE_JUSTIFICATION)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
