//! `SQLite` implementation of [`TagRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use casebook_app::ports::TagRepository;
use casebook_domain::error::CasebookError;
use casebook_domain::id::TagId;
use casebook_domain::tag::Tag;

use crate::error::StorageError;
use crate::store::{SqliteStore, parse_id};

struct Wrapper(Tag);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Tag> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;

        Ok(Self(Tag {
            id: parse_id(&id)?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO tags (id, name, name_key, description) VALUES (?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM tags WHERE id = ?";
const SELECT_BY_KEY: &str = "SELECT * FROM tags WHERE name_key = ?";
const SELECT_ALL: &str = "SELECT * FROM tags ORDER BY name";
const DELETE_BY_ID: &str = "DELETE FROM tags WHERE id = ?";

impl TagRepository for SqliteStore {
    async fn create_tag(&self, tag: Tag) -> Result<Tag, CasebookError> {
        sqlx::query(INSERT)
            .bind(tag.id.to_string())
            .bind(&tag.name)
            .bind(tag.normalized_name())
            .bind(&tag.description)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(tag)
    }

    async fn get_tag(&self, id: TagId) -> Result<Option<Tag>, CasebookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_tag_by_name(&self, normalized_name: &str) -> Result<Option<Tag>, CasebookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_KEY)
            .bind(normalized_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, CasebookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn delete_tag(&self, id: TagId) -> Result<(), CasebookError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
