//! Feedback service: tourists voting and commenting on sites.

use casebook_domain::error::{AuthError, CasebookError, ConflictError};
use casebook_domain::event::{Event, EventKind};
use casebook_domain::feedback::{Feedback, SiteRating, Vote};
use casebook_domain::id::{FeedbackId, SiteId, TouristId};
use casebook_domain::time::now;

use crate::ports::{EventPublisher, FeedbackRepository, SiteRepository, TouristRepository};

pub struct FeedbackService<S, P> {
    store: S,
    publisher: P,
}

impl<S, P> FeedbackService<S, P>
where
    S: FeedbackRepository + TouristRepository + SiteRepository,
    P: EventPublisher,
{
    pub fn new(store: S, publisher: P) -> Self {
        Self { store, publisher }
    }

    /// Release a tourist's feedback for a site.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the tourist or site is
    /// missing, [`CasebookError::Validation`] for an invalid comment,
    /// [`ConflictError::FeedbackAlreadyReleased`] when the tourist already
    /// rated this site, or a storage error.
    pub async fn insert(
        &self,
        tourist: TouristId,
        site: SiteId,
        vote: Vote,
        comment: &str,
    ) -> Result<Feedback, CasebookError> {
        if self.store.get_tourist(tourist).await?.is_none() {
            return Err(tourist.not_found().into());
        }
        if self.store.get_site(site).await?.is_none() {
            return Err(site.not_found().into());
        }
        let feedback = Feedback::new(tourist, site, vote, comment)?;

        if self.store.find_feedback(tourist, site).await?.is_some() {
            tracing::warn!(tourist_id = %tourist, site_id = %site, "feedback already released");
            return Err(ConflictError::FeedbackAlreadyReleased {
                tourist: tourist.to_string(),
                site: site.to_string(),
            }
            .into());
        }

        let feedback = self.store.create_feedback(feedback).await?;
        self.publisher
            .publish(Event::new(
                EventKind::FeedbackInserted,
                Some(feedback.id.as_uuid()),
                serde_json::json!({
                    "tourist_id": tourist,
                    "site_id": site,
                    "vote": feedback.vote,
                }),
            ))
            .await?;
        tracing::info!(feedback_id = %feedback.id, vote = feedback.vote.value(), "feedback inserted");
        Ok(feedback)
    }

    /// Replace the comment of a feedback on behalf of its author.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`], [`AuthError::NotOwner`] when
    /// `author` did not write the feedback, [`CasebookError::Validation`]
    /// for a comment outside the accepted length, or a storage error.
    pub async fn modify_comment(
        &self,
        id: FeedbackId,
        author: TouristId,
        comment: &str,
    ) -> Result<Feedback, CasebookError> {
        let mut feedback = self
            .store
            .get_feedback(id)
            .await?
            .ok_or_else(|| CasebookError::from(id.not_found()))?;

        if feedback.tourist_id != author {
            tracing::warn!(feedback_id = %id, tourist_id = %author, "comment change by non-author");
            return Err(AuthError::NotOwner {
                action: "modify this comment",
            }
            .into());
        }
        feedback.edit_comment(comment, now())?;

        let feedback = self.store.update_feedback(feedback).await?;
        self.publisher
            .publish(Event::new(
                EventKind::FeedbackModified,
                Some(feedback.id.as_uuid()),
                serde_json::json!({ "tourist_id": author }),
            ))
            .await?;
        tracing::info!(feedback_id = %id, "feedback comment modified");
        Ok(feedback)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the site is missing, or a
    /// storage error.
    pub async fn list_for_site(&self, site: SiteId) -> Result<Vec<Feedback>, CasebookError> {
        if self.store.get_site(site).await?.is_none() {
            return Err(site.not_found().into());
        }
        self.store.feedback_for_site(site).await
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the tourist is missing, or a
    /// storage error.
    pub async fn list_for_tourist(
        &self,
        tourist: TouristId,
    ) -> Result<Vec<Feedback>, CasebookError> {
        if self.store.get_tourist(tourist).await?.is_none() {
            return Err(tourist.not_found().into());
        }
        self.store.feedback_by_tourist(tourist).await
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the site is missing, or a
    /// storage error.
    pub async fn site_rating(&self, site: SiteId) -> Result<SiteRating, CasebookError> {
        let feedback = self.list_for_site(site).await?;
        Ok(SiteRating::from_feedback(site, &feedback))
    }
}
