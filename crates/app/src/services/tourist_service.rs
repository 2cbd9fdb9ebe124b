//! Tourist service: registration, authentication, profile and search
//! preference use-cases.

use std::collections::BTreeSet;

use casebook_domain::credential::PasswordDigest;
use casebook_domain::error::{AuthError, CasebookError, ConflictError};
use casebook_domain::event::{Event, EventKind};
use casebook_domain::id::{SiteId, TagId, TouristId};
use casebook_domain::site::Site;
use casebook_domain::tourist::{
    PasswordChange, ProfileUpdate, RegistrationForm, SearchPreferences, Tourist,
};

use crate::ports::{EventPublisher, SiteRepository, TagRepository, TouristRepository};

/// Application service for eTour accounts.
pub struct TouristService<S, P> {
    store: S,
    publisher: P,
}

impl<S, P> TouristService<S, P>
where
    S: TouristRepository + SiteRepository + TagRepository,
    P: EventPublisher,
{
    pub fn new(store: S, publisher: P) -> Self {
        Self { store, publisher }
    }

    /// Register a new tourist from a guest's form.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] listing every failed rule,
    /// [`ConflictError::UsernameTaken`] or [`ConflictError::EmailTaken`]
    /// when the account already exists, or a storage error.
    pub async fn register(&self, form: &RegistrationForm) -> Result<Tourist, CasebookError> {
        let tourist = Tourist::register(form)?;

        if self
            .store
            .find_tourist_by_username(&tourist.username)
            .await?
            .is_some()
        {
            tracing::warn!(username = %tourist.username, "registration rejected, username taken");
            return Err(ConflictError::UsernameTaken(tourist.username).into());
        }
        if self
            .store
            .find_tourist_by_email(&tourist.email)
            .await?
            .is_some()
        {
            tracing::warn!(email = %tourist.email, "registration rejected, email taken");
            return Err(ConflictError::EmailTaken(tourist.email).into());
        }

        let tourist = self.store.create_tourist(tourist).await?;
        self.publisher
            .publish(Event::new(
                EventKind::TouristRegistered,
                Some(tourist.id.as_uuid()),
                serde_json::json!({ "username": tourist.username }),
            ))
            .await?;
        tracing::info!(tourist_id = %tourist.id, username = %tourist.username, "tourist registered");
        Ok(tourist)
    }

    /// Check a username and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown username or a
    /// wrong password, or a storage error.
    pub async fn login(&self, username: &str, password: &str) -> Result<Tourist, CasebookError> {
        match self.store.find_tourist_by_username(username.trim()).await? {
            Some(tourist) if tourist.password.verify(password) => {
                tracing::info!(tourist_id = %tourist.id, "tourist logged in");
                Ok(tourist)
            }
            _ => {
                tracing::warn!(username, "tourist login rejected");
                Err(AuthError::InvalidCredentials.into())
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when no tourist has `id`, or a
    /// storage error.
    pub async fn get(&self, id: TouristId) -> Result<Tourist, CasebookError> {
        self.store
            .get_tourist(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self) -> Result<Vec<Tourist>, CasebookError> {
        self.store.list_tourists().await
    }

    /// Tourists whose username or full name contains `query`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn search(&self, query: &str) -> Result<Vec<Tourist>, CasebookError> {
        let all = self.store.list_tourists().await?;
        let found: Vec<Tourist> = all.into_iter().filter(|t| t.matches(query)).collect();
        tracing::debug!(query, found = found.len(), "tourist search");
        Ok(found)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`], [`CasebookError::Validation`],
    /// [`ConflictError::EmailTaken`] when another tourist owns the new email,
    /// or a storage error.
    pub async fn update_profile(
        &self,
        id: TouristId,
        update: &ProfileUpdate,
    ) -> Result<Tourist, CasebookError> {
        let mut tourist = self.get(id).await?;
        tourist.apply(update)?;

        if let Some(other) = self.store.find_tourist_by_email(&tourist.email).await?
            && other.id != id
        {
            return Err(ConflictError::EmailTaken(tourist.email).into());
        }

        let tourist = self.store.update_tourist(tourist).await?;
        tracing::info!(tourist_id = %id, "tourist profile updated");
        Ok(tourist)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`], [`AuthError::InvalidCredentials`]
    /// when the current password does not verify, [`CasebookError::Validation`]
    /// when the new password breaks the policy, or a storage error.
    pub async fn change_password(
        &self,
        id: TouristId,
        change: &PasswordChange,
    ) -> Result<(), CasebookError> {
        let mut tourist = self.get(id).await?;
        if !tourist.password.verify(&change.current_password) {
            tracing::warn!(tourist_id = %id, "password change rejected");
            return Err(AuthError::InvalidCredentials.into());
        }
        change.validate()?;
        tourist.password = PasswordDigest::derive(&change.new_password);
        self.store.update_tourist(tourist).await?;
        tracing::info!(tourist_id = %id, "tourist password changed");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn delete(&self, id: TouristId) -> Result<(), CasebookError> {
        self.get(id).await?;
        self.store.delete_tourist(id).await?;
        tracing::info!(tourist_id = %id, "tourist deleted");
        Ok(())
    }

    /// Add a site to the tourist's preferences. Adding it twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the tourist or site is
    /// missing, or a storage error.
    pub async fn add_preferred_site(
        &self,
        id: TouristId,
        site: SiteId,
    ) -> Result<(), CasebookError> {
        self.get(id).await?;
        if self.store.get_site(site).await?.is_none() {
            return Err(site.not_found().into());
        }
        self.store.add_preferred_site(id, site).await?;
        tracing::info!(tourist_id = %id, site_id = %site, "preferred site added");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the tourist is missing, or a
    /// storage error.
    pub async fn remove_preferred_site(
        &self,
        id: TouristId,
        site: SiteId,
    ) -> Result<(), CasebookError> {
        self.get(id).await?;
        self.store.remove_preferred_site(id, site).await?;
        tracing::info!(tourist_id = %id, site_id = %site, "preferred site removed");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the tourist is missing, or a
    /// storage error.
    pub async fn preferred_sites(&self, id: TouristId) -> Result<Vec<Site>, CasebookError> {
        self.get(id).await?;
        let mut sites = Vec::new();
        for site_id in self.store.preferred_sites(id).await? {
            if let Some(site) = self.store.get_site(site_id).await? {
                sites.push(site);
            }
        }
        Ok(sites)
    }

    /// Replace the tags the tourist wants suggestions for.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the tourist or a tag is
    /// missing, [`CasebookError::Validation`] when too many tags are given,
    /// or a storage error.
    pub async fn set_search_preferences(
        &self,
        id: TouristId,
        tags: BTreeSet<TagId>,
    ) -> Result<SearchPreferences, CasebookError> {
        self.get(id).await?;
        let preferences = SearchPreferences::new(tags)?;
        for tag in &preferences.tags {
            if self.store.get_tag(*tag).await?.is_none() {
                return Err(tag.not_found().into());
            }
        }
        self.store
            .set_preferred_tags(id, preferences.tags.clone())
            .await?;
        tracing::info!(tourist_id = %id, tags = preferences.tags.len(), "search preferences saved");
        Ok(preferences)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the tourist is missing, or a
    /// storage error.
    pub async fn search_preferences(&self, id: TouristId) -> Result<SearchPreferences, CasebookError> {
        self.get(id).await?;
        Ok(SearchPreferences {
            tags: self.store.preferred_tags(id).await?,
        })
    }

    /// Sites carrying at least one of the tourist's preferred tags, ordered
    /// by name.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the tourist is missing, or a
    /// storage error.
    pub async fn suggested_sites(&self, id: TouristId) -> Result<Vec<Site>, CasebookError> {
        let preferences = self.search_preferences(id).await?;
        let sites = self.store.list_sites().await?;
        Ok(sites.into_iter().filter(|s| preferences.suits(s)).collect())
    }
}
