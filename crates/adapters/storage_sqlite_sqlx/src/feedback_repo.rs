//! `SQLite` implementation of [`FeedbackRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use casebook_app::ports::FeedbackRepository;
use casebook_domain::error::CasebookError;
use casebook_domain::feedback::{Feedback, Vote};
use casebook_domain::id::{FeedbackId, SiteId, TouristId};

use crate::error::StorageError;
use crate::store::{SqliteStore, decode_err, parse_id, parse_timestamp};

struct Wrapper(Feedback);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Feedback> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let tourist_id: String = row.try_get("tourist_id")?;
        let site_id: String = row.try_get("site_id")?;
        let vote: u8 = row.try_get("vote")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Self(Feedback {
            id: parse_id(&id)?,
            tourist_id: parse_id(&tourist_id)?,
            site_id: parse_id(&site_id)?,
            vote: Vote::try_from(vote).map_err(decode_err)?,
            comment: row.try_get("comment")?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO feedback (id, tourist_id, site_id, vote, comment, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM feedback WHERE id = ?";
const SELECT_BY_PAIR: &str = "SELECT * FROM feedback WHERE tourist_id = ? AND site_id = ?";
const SELECT_BY_SITE: &str =
    "SELECT * FROM feedback WHERE site_id = ? ORDER BY created_at, rowid";
const SELECT_BY_TOURIST: &str =
    "SELECT * FROM feedback WHERE tourist_id = ? ORDER BY created_at, rowid";
const UPDATE: &str = "UPDATE feedback SET vote = ?, comment = ?, updated_at = ? WHERE id = ?";

impl SqliteStore {
    async fn feedback_where(&self, query: &str, id: String) -> Result<Vec<Feedback>, CasebookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(query)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

impl FeedbackRepository for SqliteStore {
    async fn create_feedback(&self, feedback: Feedback) -> Result<Feedback, CasebookError> {
        sqlx::query(INSERT)
            .bind(feedback.id.to_string())
            .bind(feedback.tourist_id.to_string())
            .bind(feedback.site_id.to_string())
            .bind(feedback.vote.value())
            .bind(&feedback.comment)
            .bind(feedback.created_at.to_rfc3339())
            .bind(feedback.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(feedback)
    }

    async fn get_feedback(&self, id: FeedbackId) -> Result<Option<Feedback>, CasebookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_feedback(
        &self,
        tourist: TouristId,
        site: SiteId,
    ) -> Result<Option<Feedback>, CasebookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_PAIR)
            .bind(tourist.to_string())
            .bind(site.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn feedback_for_site(&self, site: SiteId) -> Result<Vec<Feedback>, CasebookError> {
        self.feedback_where(SELECT_BY_SITE, site.to_string()).await
    }

    async fn feedback_by_tourist(&self, tourist: TouristId) -> Result<Vec<Feedback>, CasebookError> {
        self.feedback_where(SELECT_BY_TOURIST, tourist.to_string())
            .await
    }

    async fn update_feedback(&self, feedback: Feedback) -> Result<Feedback, CasebookError> {
        sqlx::query(UPDATE)
            .bind(feedback.vote.value())
            .bind(&feedback.comment)
            .bind(feedback.updated_at.to_rfc3339())
            .bind(feedback.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(feedback)
    }
}
