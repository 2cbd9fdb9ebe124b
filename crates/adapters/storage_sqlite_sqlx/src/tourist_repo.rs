//! `SQLite` implementation of [`TouristRepository`].
//!
//! Preferred sites and search preference tags live in their own join tables.

use std::collections::BTreeSet;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use casebook_app::ports::TouristRepository;
use casebook_domain::credential::PasswordDigest;
use casebook_domain::error::CasebookError;
use casebook_domain::id::{SiteId, TagId, TouristId};
use casebook_domain::tourist::Tourist;

use crate::error::StorageError;
use crate::store::{SqliteStore, parse_id, parse_timestamp};

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Tourist);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Tourist> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let password: String = row.try_get("password")?;
        let registered_at: String = row.try_get("registered_at")?;

        Ok(Self(Tourist {
            id: parse_id(&id)?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            password: PasswordDigest::from_stored(password),
            registered_at: parse_timestamp(&registered_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO tourists (id, username, email, full_name, password, registered_at)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM tourists WHERE id = ?";
const SELECT_BY_USERNAME: &str = "SELECT * FROM tourists WHERE username = ?";
const SELECT_BY_EMAIL: &str = "SELECT * FROM tourists WHERE email = ?";
const SELECT_ALL: &str = "SELECT * FROM tourists ORDER BY username";
const UPDATE: &str = r"
    UPDATE tourists SET username = ?, email = ?, full_name = ?, password = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM tourists WHERE id = ?";

const INSERT_PREFERENCE: &str = r"
    INSERT INTO preferred_sites (tourist_id, site_id, added_at) VALUES (?, ?, ?)
    ON CONFLICT (tourist_id, site_id) DO NOTHING
";
const DELETE_PREFERENCE: &str =
    "DELETE FROM preferred_sites WHERE tourist_id = ? AND site_id = ?";
const SELECT_PREFERENCES: &str =
    "SELECT site_id FROM preferred_sites WHERE tourist_id = ? ORDER BY added_at, rowid";

const INSERT_TAG: &str = "INSERT INTO tourist_tags (tourist_id, tag_id) VALUES (?, ?)";
const DELETE_TAGS: &str = "DELETE FROM tourist_tags WHERE tourist_id = ?";
const SELECT_TAGS: &str = "SELECT tag_id FROM tourist_tags WHERE tourist_id = ?";

impl TouristRepository for SqliteStore {
    async fn create_tourist(&self, tourist: Tourist) -> Result<Tourist, CasebookError> {
        sqlx::query(INSERT)
            .bind(tourist.id.to_string())
            .bind(&tourist.username)
            .bind(&tourist.email)
            .bind(&tourist.full_name)
            .bind(tourist.password.as_str())
            .bind(tourist.registered_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(tourist)
    }

    async fn get_tourist(&self, id: TouristId) -> Result<Option<Tourist>, CasebookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_tourist_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Tourist>, CasebookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_USERNAME)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_tourist_by_email(&self, email: &str) -> Result<Option<Tourist>, CasebookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn list_tourists(&self) -> Result<Vec<Tourist>, CasebookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update_tourist(&self, tourist: Tourist) -> Result<Tourist, CasebookError> {
        sqlx::query(UPDATE)
            .bind(&tourist.username)
            .bind(&tourist.email)
            .bind(&tourist.full_name)
            .bind(tourist.password.as_str())
            .bind(tourist.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(tourist)
    }

    async fn delete_tourist(&self, id: TouristId) -> Result<(), CasebookError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn add_preferred_site(&self, tourist: TouristId, site: SiteId) -> Result<(), CasebookError> {
        sqlx::query(INSERT_PREFERENCE)
            .bind(tourist.to_string())
            .bind(site.to_string())
            .bind(casebook_domain::time::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn remove_preferred_site(
        &self,
        tourist: TouristId,
        site: SiteId,
    ) -> Result<(), CasebookError> {
        sqlx::query(DELETE_PREFERENCE)
            .bind(tourist.to_string())
            .bind(site.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn preferred_sites(&self, tourist: TouristId) -> Result<Vec<SiteId>, CasebookError> {
        let rows: Vec<(String,)> = sqlx::query_as(SELECT_PREFERENCES)
            .bind(tourist.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let ids = rows
            .iter()
            .map(|(id,)| parse_id(id))
            .collect::<Result<Vec<SiteId>, _>>()
            .map_err(StorageError::from)?;
        Ok(ids)
    }

    async fn set_preferred_tags(
        &self,
        tourist: TouristId,
        tags: BTreeSet<TagId>,
    ) -> Result<(), CasebookError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
        sqlx::query(DELETE_TAGS)
            .bind(tourist.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        for tag in &tags {
            sqlx::query(INSERT_TAG)
                .bind(tourist.to_string())
                .bind(tag.to_string())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }
        tx.commit().await.map_err(StorageError::from)?;

        Ok(())
    }

    async fn preferred_tags(&self, tourist: TouristId) -> Result<BTreeSet<TagId>, CasebookError> {
        let rows: Vec<(String,)> = sqlx::query_as(SELECT_TAGS)
            .bind(tourist.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let tags = rows
            .iter()
            .map(|(id,)| parse_id(id))
            .collect::<Result<BTreeSet<TagId>, _>>()
            .map_err(StorageError::from)?;
        Ok(tags)
    }
}
