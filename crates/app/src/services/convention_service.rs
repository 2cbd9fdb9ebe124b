//! Convention service: refreshment points asking agencies for a convention
//! and agency operators activating it.
//!
//! A point has at most one pending request at a time, and its active
//! conventions never cover the same day.

use casebook_domain::convention::{Convention, ConventionRequest};
use casebook_domain::error::{CasebookError, ConflictError};
use casebook_domain::event::{Event, EventKind};
use casebook_domain::id::{ConventionId, RefreshmentPointId};
use casebook_domain::time::Date;

use crate::ports::{ConventionRepository, EventPublisher, RefreshmentPointRepository};

pub struct ConventionService<S, P> {
    store: S,
    publisher: P,
}

impl<S, P> ConventionService<S, P>
where
    S: RefreshmentPointRepository + ConventionRepository,
    P: EventPublisher,
{
    pub fn new(store: S, publisher: P) -> Self {
        Self { store, publisher }
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the point is missing,
    /// [`CasebookError::Validation`] for invalid terms,
    /// [`ConflictError::ConventionPending`] while an earlier request waits,
    /// or a storage error.
    pub async fn request(
        &self,
        point: RefreshmentPointId,
        request: &ConventionRequest,
        today: Date,
    ) -> Result<Convention, CasebookError> {
        if self.store.get_point(point).await?.is_none() {
            return Err(point.not_found().into());
        }
        let convention = Convention::request(point, request, today)?;
        if self
            .store
            .conventions_for_point(point)
            .await?
            .iter()
            .any(Convention::is_pending)
        {
            tracing::warn!(point_id = %point, "convention request rejected, one is pending");
            return Err(ConflictError::ConventionPending(point.to_string()).into());
        }

        let convention = self.store.create_convention(convention).await?;
        self.publisher
            .publish(Event::new(
                EventKind::ConventionRequested,
                Some(convention.id.as_uuid()),
                serde_json::json!({
                    "point_id": point,
                    "agency": convention.agency,
                    "start_date": convention.start_date,
                    "end_date": convention.end_date,
                }),
            ))
            .await?;
        tracing::info!(convention_id = %convention.id, point_id = %point, "convention requested");
        Ok(convention)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`],
    /// [`ConflictError::ConventionNotPending`] when it is already active,
    /// [`ConflictError::ConventionOverlap`] when an active convention of the
    /// same point shares a day, [`CasebookError::Validation`] when the period
    /// is over, or a storage error.
    pub async fn activate(&self, id: ConventionId, today: Date) -> Result<Convention, CasebookError> {
        let mut convention = self.get(id).await?;
        if !convention.is_pending() {
            return Err(ConflictError::ConventionNotPending(id.to_string()).into());
        }
        let clash = self
            .store
            .conventions_for_point(convention.point_id)
            .await?
            .into_iter()
            .any(|other| !other.is_pending() && other.overlaps(&convention));
        if clash {
            tracing::warn!(convention_id = %id, "activation rejected, period overlaps");
            return Err(ConflictError::ConventionOverlap(convention.point_id.to_string()).into());
        }
        convention.activate(today)?;

        let convention = self.store.update_convention(convention).await?;
        self.publisher
            .publish(Event::new(
                EventKind::ConventionActivated,
                Some(id.as_uuid()),
                serde_json::json!({
                    "point_id": convention.point_id,
                    "agency": convention.agency,
                }),
            ))
            .await?;
        tracing::info!(convention_id = %id, point_id = %convention.point_id, "convention activated");
        Ok(convention)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn get(&self, id: ConventionId) -> Result<Convention, CasebookError> {
        self.store
            .get_convention(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }

    /// Conventions of a point, most recent request first.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the point is missing, or a
    /// storage error.
    pub async fn history(&self, point: RefreshmentPointId) -> Result<Vec<Convention>, CasebookError> {
        if self.store.get_point(point).await?.is_none() {
            return Err(point.not_found().into());
        }
        self.store.conventions_for_point(point).await
    }
}
