//! Banner service: refreshment points and the banners they display.

use casebook_domain::banner::{Banner, BannerImage, ImageUpload};
use casebook_domain::error::{CasebookError, ConflictError, ValidationError};
use casebook_domain::event::{Event, EventKind};
use casebook_domain::id::{BannerId, RefreshmentPointId};
use casebook_domain::refreshment_point::{PointDetails, RefreshmentPoint};

use crate::ports::{BannerRepository, EventPublisher, RefreshmentPointRepository};

pub struct BannerService<S, P> {
    store: S,
    publisher: P,
}

impl<S, P> BannerService<S, P>
where
    S: RefreshmentPointRepository + BannerRepository,
    P: EventPublisher,
{
    pub fn new(store: S, publisher: P) -> Self {
        Self { store, publisher }
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] if invariants fail, or a
    /// storage error.
    pub async fn create_point(
        &self,
        details: PointDetails,
    ) -> Result<RefreshmentPoint, CasebookError> {
        let point = self.store.create_point(details.into_point()?).await?;
        tracing::info!(point_id = %point.id, name = %point.name, "refreshment point created");
        Ok(point)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn get_point(&self, id: RefreshmentPointId) -> Result<RefreshmentPoint, CasebookError> {
        self.store
            .get_point(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_points(&self) -> Result<Vec<RefreshmentPoint>, CasebookError> {
        self.store.list_points().await
    }

    /// Points whose name or address contains `query`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn search_points(&self, query: &str) -> Result<Vec<RefreshmentPoint>, CasebookError> {
        let all = self.store.list_points().await?;
        let found: Vec<RefreshmentPoint> = all.into_iter().filter(|p| p.matches(query)).collect();
        tracing::debug!(query, found = found.len(), "refreshment point search");
        Ok(found)
    }

    /// Modify a point. The capacity cannot drop below the banners it
    /// already displays.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`], [`CasebookError::Validation`],
    /// or a storage error.
    pub async fn update_point(
        &self,
        id: RefreshmentPointId,
        details: &PointDetails,
    ) -> Result<RefreshmentPoint, CasebookError> {
        let mut point = self.get_point(id).await?;
        point.apply(details)?;

        let displayed = self.store.banners_for_point(id).await?.len();
        if u32::try_from(displayed).is_ok_and(|n| n > point.max_banners) {
            tracing::warn!(point_id = %id, displayed, max = point.max_banners, "capacity below banner count");
            return Err(ValidationError::Rule(
                "max_banners cannot be lower than the number of banners displayed",
            )
            .into());
        }

        let point = self.store.update_point(point).await?;
        tracing::info!(point_id = %id, "refreshment point modified");
        Ok(point)
    }

    /// Delete a point together with its banners.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn delete_point(&self, id: RefreshmentPointId) -> Result<(), CasebookError> {
        self.get_point(id).await?;
        self.store.delete_point(id).await?;
        tracing::info!(point_id = %id, "refreshment point deleted");
        Ok(())
    }

    /// Add a banner to a point.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the point is missing,
    /// [`CasebookError::Validation`] when the image breaks a rule,
    /// [`ConflictError::BannerLimitReached`] when the point is full, or a
    /// storage error.
    pub async fn insert_banner(
        &self,
        point_id: RefreshmentPointId,
        upload: ImageUpload,
    ) -> Result<Banner, CasebookError> {
        let point = self.get_point(point_id).await?;
        let banner = Banner::new(point_id, upload)?;

        let banner = match self
            .store
            .create_banner_within(banner, point.max_banners)
            .await
        {
            Err(CasebookError::Conflict(err @ ConflictError::BannerLimitReached { .. })) => {
                tracing::warn!(point_id = %point_id, max = point.max_banners, "banner limit reached");
                return Err(err.into());
            }
            other => other?,
        };
        self.publisher
            .publish(Event::new(
                EventKind::BannerInserted,
                Some(banner.id.as_uuid()),
                serde_json::json!({
                    "point_id": point_id,
                    "path": banner.image.path,
                }),
            ))
            .await?;
        tracing::info!(banner_id = %banner.id, point_id = %point_id, "banner inserted");
        Ok(banner)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the point is missing, or a
    /// storage error.
    pub async fn list_banners(
        &self,
        point_id: RefreshmentPointId,
    ) -> Result<Vec<Banner>, CasebookError> {
        self.get_point(point_id).await?;
        self.store.banners_for_point(point_id).await
    }

    /// Swap the image of an existing banner.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`], [`CasebookError::Validation`],
    /// or a storage error.
    pub async fn replace_image(
        &self,
        id: BannerId,
        upload: ImageUpload,
    ) -> Result<Banner, CasebookError> {
        let mut banner = self.get_banner(id).await?;
        banner.image = BannerImage::try_from(upload)?;
        let banner = self.store.update_banner(banner).await?;
        tracing::info!(banner_id = %id, "banner image replaced");
        Ok(banner)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn delete_banner(&self, id: BannerId) -> Result<(), CasebookError> {
        self.get_banner(id).await?;
        self.store.delete_banner(id).await?;
        tracing::info!(banner_id = %id, "banner deleted");
        Ok(())
    }

    async fn get_banner(&self, id: BannerId) -> Result<Banner, CasebookError> {
        self.store
            .get_banner(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }
}
