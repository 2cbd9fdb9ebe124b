//! Site service: cultural heritage catalogue use-cases.

use casebook_domain::error::CasebookError;
use casebook_domain::id::{SiteId, TagId};
use casebook_domain::site::{Site, SiteDetails, SiteQuery};

use crate::ports::{SiteRepository, TagRepository};

/// Application service for site CRUD, search and tagging.
pub struct SiteService<S> {
    store: S,
}

impl<S: SiteRepository + TagRepository> SiteService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Insert a new site.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    pub async fn create(&self, details: SiteDetails) -> Result<Site, CasebookError> {
        let site = self.store.create_site(details.into_site()?).await?;
        tracing::info!(site_id = %site.id, name = %site.name, "site inserted");
        Ok(site)
    }

    /// Look up a site by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when no site with `id` exists,
    /// or a storage error from the repository.
    pub async fn get(&self, id: SiteId) -> Result<Site, CasebookError> {
        self.store
            .get_site(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self) -> Result<Vec<Site>, CasebookError> {
        self.store.list_sites().await
    }

    /// Sites matching every criterion of `query`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn search(&self, query: &SiteQuery) -> Result<Vec<Site>, CasebookError> {
        let sites = self.store.list_sites().await?;
        let found: Vec<Site> = sites.into_iter().filter(|s| query.matches(s)).collect();
        tracing::debug!(?query, found = found.len(), "site search");
        Ok(found)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`], [`CasebookError::Validation`],
    /// or a storage error.
    pub async fn update(&self, id: SiteId, details: &SiteDetails) -> Result<Site, CasebookError> {
        let mut site = self.get(id).await?;
        site.apply(details)?;
        let site = self.store.update_site(site).await?;
        tracing::info!(site_id = %id, "site modified");
        Ok(site)
    }

    /// Delete a site and everything attached to it.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn delete(&self, id: SiteId) -> Result<(), CasebookError> {
        self.get(id).await?;
        self.store.delete_site(id).await?;
        tracing::info!(site_id = %id, "site deleted");
        Ok(())
    }

    /// Attach an existing tag to a site. Tagging twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the site or tag is missing,
    /// or a storage error.
    pub async fn tag_site(&self, id: SiteId, tag: TagId) -> Result<Site, CasebookError> {
        let mut site = self.get(id).await?;
        if self.store.get_tag(tag).await?.is_none() {
            return Err(tag.not_found().into());
        }
        if !site.tag(tag) {
            return Ok(site);
        }
        let site = self.store.update_site(site).await?;
        tracing::info!(site_id = %id, tag_id = %tag, "site tagged");
        Ok(site)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the site is missing, or a
    /// storage error.
    pub async fn untag_site(&self, id: SiteId, tag: TagId) -> Result<Site, CasebookError> {
        let mut site = self.get(id).await?;
        if !site.untag(tag) {
            return Ok(site);
        }
        let site = self.store.update_site(site).await?;
        tracing::info!(site_id = %id, tag_id = %tag, "site untagged");
        Ok(site)
    }
}
