//! `SQLite` implementation of [`ConventionRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use casebook_app::ports::ConventionRepository;
use casebook_domain::convention::{Convention, ConventionStatus};
use casebook_domain::error::CasebookError;
use casebook_domain::id::{ConventionId, RefreshmentPointId};

use crate::error::StorageError;
use crate::store::{SqliteStore, decode_err, parse_date, parse_id, parse_timestamp};

struct Wrapper(Convention);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let point_id: String = row.try_get("point_id")?;
        let start_date: String = row.try_get("start_date")?;
        let end_date: String = row.try_get("end_date")?;
        let status: String = row.try_get("status")?;
        let requested_at: String = row.try_get("requested_at")?;
        let activated_at: Option<String> = row.try_get("activated_at")?;

        Ok(Self(Convention {
            id: parse_id(&id)?,
            point_id: parse_id(&point_id)?,
            agency: row.try_get("agency")?,
            start_date: parse_date(&start_date)?,
            end_date: parse_date(&end_date)?,
            status: status.parse::<ConventionStatus>().map_err(decode_err)?,
            requested_at: parse_timestamp(&requested_at)?,
            activated_at: activated_at.as_deref().map(parse_timestamp).transpose()?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO conventions
        (id, point_id, agency, start_date, end_date, status, requested_at, activated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM conventions WHERE id = ?";
const SELECT_BY_POINT: &str =
    "SELECT * FROM conventions WHERE point_id = ? ORDER BY requested_at DESC, rowid DESC";
const UPDATE: &str = r"
    UPDATE conventions
    SET agency = ?, start_date = ?, end_date = ?, status = ?, activated_at = ?
    WHERE id = ?
";

impl ConventionRepository for SqliteStore {
    async fn create_convention(&self, convention: Convention) -> Result<Convention, CasebookError> {
        sqlx::query(INSERT)
            .bind(convention.id.to_string())
            .bind(convention.point_id.to_string())
            .bind(&convention.agency)
            .bind(convention.start_date.to_string())
            .bind(convention.end_date.to_string())
            .bind(convention.status.as_str())
            .bind(convention.requested_at.to_rfc3339())
            .bind(convention.activated_at.map(|ts| ts.to_rfc3339()))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(convention)
    }

    async fn get_convention(&self, id: ConventionId) -> Result<Option<Convention>, CasebookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn conventions_for_point(
        &self,
        point: RefreshmentPointId,
    ) -> Result<Vec<Convention>, CasebookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_POINT)
            .bind(point.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update_convention(&self, convention: Convention) -> Result<Convention, CasebookError> {
        sqlx::query(UPDATE)
            .bind(&convention.agency)
            .bind(convention.start_date.to_string())
            .bind(convention.end_date.to_string())
            .bind(convention.status.as_str())
            .bind(convention.activated_at.map(|ts| ts.to_rfc3339()))
            .bind(convention.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(convention)
    }
}
