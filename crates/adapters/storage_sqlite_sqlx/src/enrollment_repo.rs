//! `SQLite` implementation of [`EnrollmentRequestRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use casebook_app::ports::EnrollmentRequestRepository;
use casebook_domain::credential::PasswordDigest;
use casebook_domain::enrollment::EnrollmentRequest;
use casebook_domain::error::CasebookError;
use casebook_domain::id::EnrollmentRequestId;

use crate::error::StorageError;
use crate::store::{SqliteStore, parse_id, parse_timestamp};

struct Wrapper(EnrollmentRequest);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let password: String = row.try_get("password")?;
        let requested_at: String = row.try_get("requested_at")?;

        Ok(Self(EnrollmentRequest {
            id: parse_id(&id)?,
            login: row.try_get("login")?,
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            password: PasswordDigest::from_stored(password),
            requested_at: parse_timestamp(&requested_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO enrollment_requests (id, login, full_name, email, password, requested_at)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM enrollment_requests WHERE id = ?";
const SELECT_BY_LOGIN_OR_EMAIL: &str =
    "SELECT * FROM enrollment_requests WHERE login = ? OR email = ? LIMIT 1";
const SELECT_ALL: &str = "SELECT * FROM enrollment_requests ORDER BY requested_at, rowid";
const DELETE_BY_ID: &str = "DELETE FROM enrollment_requests WHERE id = ?";

impl EnrollmentRequestRepository for SqliteStore {
    async fn create_request(
        &self,
        request: EnrollmentRequest,
    ) -> Result<EnrollmentRequest, CasebookError> {
        sqlx::query(INSERT)
            .bind(request.id.to_string())
            .bind(&request.login)
            .bind(&request.full_name)
            .bind(&request.email)
            .bind(request.password.as_str())
            .bind(request.requested_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(request)
    }

    async fn get_request(
        &self,
        id: EnrollmentRequestId,
    ) -> Result<Option<EnrollmentRequest>, CasebookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn find_request(
        &self,
        login: &str,
        email: &str,
    ) -> Result<Option<EnrollmentRequest>, CasebookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_LOGIN_OR_EMAIL)
            .bind(login)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn list_requests(&self) -> Result<Vec<EnrollmentRequest>, CasebookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn delete_request(&self, id: EnrollmentRequestId) -> Result<(), CasebookError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
