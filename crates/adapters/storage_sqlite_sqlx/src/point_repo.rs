//! `SQLite` implementation of [`RefreshmentPointRepository`] and
//! [`BannerRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use casebook_app::ports::{BannerRepository, RefreshmentPointRepository};
use casebook_domain::banner::{Banner, BannerImage, ImageFormat};
use casebook_domain::error::{CasebookError, ConflictError};
use casebook_domain::id::{BannerId, RefreshmentPointId};
use casebook_domain::refreshment_point::RefreshmentPoint;

use crate::error::StorageError;
use crate::store::{SqliteStore, decode_err, parse_id, parse_timestamp};

struct PointWrapper(RefreshmentPoint);

impl<'r> FromRow<'r, SqliteRow> for PointWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;

        Ok(Self(RefreshmentPoint {
            id: parse_id(&id)?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            max_banners: row.try_get("max_banners")?,
        }))
    }
}

struct BannerWrapper(Banner);

impl<'r> FromRow<'r, SqliteRow> for BannerWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let point_id: String = row.try_get("point_id")?;
        let format: String = row.try_get("image_format")?;
        let size_bytes: i64 = row.try_get("size_bytes")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self(Banner {
            id: parse_id(&id)?,
            point_id: parse_id(&point_id)?,
            image: BannerImage {
                path: row.try_get("image_path")?,
                format: ImageFormat::from_str(&format).map_err(decode_err)?,
                size_bytes: size_bytes.cast_unsigned(),
                width: row.try_get("width")?,
                height: row.try_get("height")?,
            },
            created_at: parse_timestamp(&created_at)?,
        }))
    }
}

const INSERT_POINT: &str =
    "INSERT INTO refreshment_points (id, name, address, max_banners) VALUES (?, ?, ?, ?)";
const SELECT_POINT: &str = "SELECT * FROM refreshment_points WHERE id = ?";
const SELECT_POINTS: &str = "SELECT * FROM refreshment_points ORDER BY name";
const UPDATE_POINT: &str =
    "UPDATE refreshment_points SET name = ?, address = ?, max_banners = ? WHERE id = ?";
const DELETE_POINT: &str = "DELETE FROM refreshment_points WHERE id = ?";

// A single statement, so the count and the insert cannot interleave with
// another writer.
const INSERT_BANNER_WITHIN: &str = r"
    INSERT INTO banners (id, point_id, image_path, image_format, size_bytes, width, height, created_at)
    SELECT ?, ?, ?, ?, ?, ?, ?, ?
    WHERE (SELECT COUNT(*) FROM banners WHERE point_id = ?) < ?
";
const SELECT_BANNER: &str = "SELECT * FROM banners WHERE id = ?";
const SELECT_BANNERS_OF_POINT: &str =
    "SELECT * FROM banners WHERE point_id = ? ORDER BY created_at, rowid";
const UPDATE_BANNER: &str = r"
    UPDATE banners SET image_path = ?, image_format = ?, size_bytes = ?, width = ?, height = ?
    WHERE id = ?
";
const DELETE_BANNER: &str = "DELETE FROM banners WHERE id = ?";

impl RefreshmentPointRepository for SqliteStore {
    async fn create_point(&self, point: RefreshmentPoint) -> Result<RefreshmentPoint, CasebookError> {
        sqlx::query(INSERT_POINT)
            .bind(point.id.to_string())
            .bind(&point.name)
            .bind(&point.address)
            .bind(point.max_banners)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(point)
    }

    async fn get_point(
        &self,
        id: RefreshmentPointId,
    ) -> Result<Option<RefreshmentPoint>, CasebookError> {
        let row: Option<PointWrapper> = sqlx::query_as(SELECT_POINT)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn list_points(&self) -> Result<Vec<RefreshmentPoint>, CasebookError> {
        let rows: Vec<PointWrapper> = sqlx::query_as(SELECT_POINTS)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update_point(&self, point: RefreshmentPoint) -> Result<RefreshmentPoint, CasebookError> {
        sqlx::query(UPDATE_POINT)
            .bind(&point.name)
            .bind(&point.address)
            .bind(point.max_banners)
            .bind(point.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(point)
    }

    async fn delete_point(&self, id: RefreshmentPointId) -> Result<(), CasebookError> {
        sqlx::query(DELETE_POINT)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}

impl BannerRepository for SqliteStore {
    async fn create_banner_within(
        &self,
        banner: Banner,
        max_banners: u32,
    ) -> Result<Banner, CasebookError> {
        let inserted = sqlx::query(INSERT_BANNER_WITHIN)
            .bind(banner.id.to_string())
            .bind(banner.point_id.to_string())
            .bind(&banner.image.path)
            .bind(banner.image.format.as_str())
            .bind(banner.image.size_bytes.cast_signed())
            .bind(banner.image.width)
            .bind(banner.image.height)
            .bind(banner.created_at.to_rfc3339())
            .bind(banner.point_id.to_string())
            .bind(max_banners)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?
            .rows_affected();

        if inserted == 0 {
            return Err(ConflictError::BannerLimitReached {
                point: banner.point_id.to_string(),
                max: max_banners,
            }
            .into());
        }
        Ok(banner)
    }

    async fn get_banner(&self, id: BannerId) -> Result<Option<Banner>, CasebookError> {
        let row: Option<BannerWrapper> = sqlx::query_as(SELECT_BANNER)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn banners_for_point(&self, point: RefreshmentPointId) -> Result<Vec<Banner>, CasebookError> {
        let rows: Vec<BannerWrapper> = sqlx::query_as(SELECT_BANNERS_OF_POINT)
            .bind(point.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update_banner(&self, banner: Banner) -> Result<Banner, CasebookError> {
        sqlx::query(UPDATE_BANNER)
            .bind(&banner.image.path)
            .bind(banner.image.format.as_str())
            .bind(banner.image.size_bytes.cast_signed())
            .bind(banner.image.width)
            .bind(banner.image.height)
            .bind(banner.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(banner)
    }

    async fn delete_banner(&self, id: BannerId) -> Result<(), CasebookError> {
        sqlx::query(DELETE_BANNER)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
