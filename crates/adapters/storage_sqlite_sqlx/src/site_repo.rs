//! `SQLite` implementation of [`SiteRepository`].
//!
//! Tags live in `site_tags`, one row per tag, and keep the order in which
//! they were attached.

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, Sqlite, Transaction};

use casebook_app::ports::SiteRepository;
use casebook_domain::error::CasebookError;
use casebook_domain::id::{SiteId, TagId};
use casebook_domain::site::Site;

use crate::error::StorageError;
use crate::store::{SqliteStore, parse_id, parse_timestamp};

/// Site row without its tags.
struct Wrapper(Site);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(Site {
            id: parse_id(&id)?,
            name: row.try_get("name")?,
            location: row.try_get("location")?,
            description: row.try_get("description")?,
            tags: Vec::new(),
            created_at: parse_timestamp(&created_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO sites (id, name, location, description, created_at)
    VALUES (?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM sites WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM sites ORDER BY name";
const UPDATE: &str = "UPDATE sites SET name = ?, location = ?, description = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM sites WHERE id = ?";

const INSERT_TAG: &str = "INSERT INTO site_tags (site_id, tag_id, position) VALUES (?, ?, ?)";
const DELETE_TAGS: &str = "DELETE FROM site_tags WHERE site_id = ?";
const SELECT_TAGS: &str = "SELECT tag_id FROM site_tags WHERE site_id = ? ORDER BY position";
const SELECT_ALL_TAGS: &str = "SELECT site_id, tag_id FROM site_tags ORDER BY site_id, position";

async fn write_tags(
    tx: &mut Transaction<'_, Sqlite>,
    site: &Site,
) -> Result<(), StorageError> {
    sqlx::query(DELETE_TAGS)
        .bind(site.id.to_string())
        .execute(&mut **tx)
        .await?;
    for (position, tag) in (0_i64..).zip(&site.tags) {
        sqlx::query(INSERT_TAG)
            .bind(site.id.to_string())
            .bind(tag.to_string())
            .bind(position)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

impl SqliteStore {
    async fn tags_of(&self, site: SiteId) -> Result<Vec<TagId>, StorageError> {
        let rows: Vec<(String,)> = sqlx::query_as(SELECT_TAGS)
            .bind(site.to_string())
            .fetch_all(&self.pool)
            .await?;
        let tags = rows
            .iter()
            .map(|(id,)| parse_id(id))
            .collect::<Result<_, _>>()?;
        Ok(tags)
    }

    async fn all_site_tags(&self) -> Result<HashMap<SiteId, Vec<TagId>>, StorageError> {
        let rows: Vec<(String, String)> = sqlx::query_as(SELECT_ALL_TAGS)
            .fetch_all(&self.pool)
            .await?;
        let mut tags: HashMap<SiteId, Vec<TagId>> = HashMap::new();
        for (site, tag) in &rows {
            tags.entry(parse_id(site)?).or_default().push(parse_id(tag)?);
        }
        Ok(tags)
    }
}

impl SiteRepository for SqliteStore {
    async fn create_site(&self, site: Site) -> Result<Site, CasebookError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
        sqlx::query(INSERT)
            .bind(site.id.to_string())
            .bind(&site.name)
            .bind(&site.location)
            .bind(&site.description)
            .bind(site.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        write_tags(&mut tx, &site).await?;
        tx.commit().await.map_err(StorageError::from)?;

        Ok(site)
    }

    async fn get_site(&self, id: SiteId) -> Result<Option<Site>, CasebookError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        match row {
            Some(Wrapper(mut site)) => {
                site.tags = self.tags_of(id).await?;
                Ok(Some(site))
            }
            None => Ok(None),
        }
    }

    async fn list_sites(&self) -> Result<Vec<Site>, CasebookError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let mut tags = self.all_site_tags().await?;

        Ok(rows
            .into_iter()
            .map(|Wrapper(mut site)| {
                site.tags = tags.remove(&site.id).unwrap_or_default();
                site
            })
            .collect())
    }

    async fn update_site(&self, site: Site) -> Result<Site, CasebookError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;
        sqlx::query(UPDATE)
            .bind(&site.name)
            .bind(&site.location)
            .bind(&site.description)
            .bind(site.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        write_tags(&mut tx, &site).await?;
        tx.commit().await.map_err(StorageError::from)?;

        Ok(site)
    }

    async fn delete_site(&self, id: SiteId) -> Result<(), CasebookError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebook_app::ports::TagRepository;
    use casebook_domain::tag::Tag;

    use crate::store::testing::store;

    fn site(name: &str) -> Site {
        Site::builder()
            .name(name)
            .location("Rome")
            .description("Ancient ruins")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_site_with_tags() {
        let store = store().await;
        let roman = store.create_tag(Tag::new("Roman", "Roman era").unwrap()).await.unwrap();
        let outdoor = store
            .create_tag(Tag::new("Outdoor", "Open air").unwrap())
            .await
            .unwrap();
        let mut forum = site("Forum");
        forum.tag(outdoor.id);
        forum.tag(roman.id);
        store.create_site(forum.clone()).await.unwrap();

        let fetched = store.get_site(forum.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Forum");
        assert_eq!(fetched.tags, vec![outdoor.id, roman.id]);
        assert_eq!(fetched.created_at, forum.created_at);
    }

    #[tokio::test]
    async fn should_return_none_when_site_not_found() {
        let store = store().await;
        assert!(store.get_site(SiteId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_list_sites_by_name_with_their_tags() {
        let store = store().await;
        let roman = store.create_tag(Tag::new("Roman", "Roman era").unwrap()).await.unwrap();
        let mut pantheon = site("Pantheon");
        pantheon.tag(roman.id);
        store.create_site(pantheon).await.unwrap();
        store.create_site(site("Colosseum")).await.unwrap();

        let all = store.list_sites().await.unwrap();
        let names: Vec<&str> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Colosseum", "Pantheon"]);
        assert!(all[0].tags.is_empty());
        assert_eq!(all[1].tags, vec![roman.id]);
    }

    #[tokio::test]
    async fn should_replace_tags_on_update() {
        let store = store().await;
        let roman = store.create_tag(Tag::new("Roman", "Roman era").unwrap()).await.unwrap();
        let mut forum = site("Forum");
        forum.tag(roman.id);
        store.create_site(forum.clone()).await.unwrap();

        forum.untag(roman.id);
        forum.location = "Roma".to_string();
        store.update_site(forum.clone()).await.unwrap();

        let fetched = store.get_site(forum.id).await.unwrap().unwrap();
        assert_eq!(fetched.location, "Roma");
        assert!(fetched.tags.is_empty());
    }

    #[tokio::test]
    async fn should_delete_site_when_exists() {
        let store = store().await;
        let forum = store.create_site(site("Forum")).await.unwrap();
        store.delete_site(forum.id).await.unwrap();
        assert!(store.get_site(forum.id).await.unwrap().is_none());
    }
}
