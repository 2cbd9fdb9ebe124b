//! Tag service: search tags an agency attaches to sites.

use casebook_domain::error::{CasebookError, ConflictError};
use casebook_domain::id::TagId;
use casebook_domain::tag::Tag;

use crate::ports::{SiteRepository, TagRepository};

pub struct TagService<S> {
    store: S,
}

impl<S: TagRepository + SiteRepository> TagService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Insert a new tag. Names are unique regardless of case.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] if invariants fail,
    /// [`ConflictError::TagAlreadyExists`] for a duplicate name, or a
    /// storage error.
    pub async fn insert(&self, name: &str, description: &str) -> Result<Tag, CasebookError> {
        let tag = Tag::new(name, description)?;
        if self
            .store
            .find_tag_by_name(&tag.normalized_name())
            .await?
            .is_some()
        {
            tracing::warn!(name = %tag.name, "tag already exists");
            return Err(ConflictError::TagAlreadyExists(tag.name).into());
        }
        let tag = self.store.create_tag(tag).await?;
        tracing::info!(tag_id = %tag.id, name = %tag.name, "tag inserted");
        Ok(tag)
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list(&self) -> Result<Vec<Tag>, CasebookError> {
        self.store.list_tags().await
    }

    /// Delete a tag and detach it from every site.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn delete(&self, id: TagId) -> Result<(), CasebookError> {
        if self.store.get_tag(id).await?.is_none() {
            return Err(id.not_found().into());
        }
        let mut detached = 0_usize;
        for mut site in self.store.list_sites().await? {
            if site.untag(id) {
                self.store.update_site(site).await?;
                detached += 1;
            }
        }
        self.store.delete_tag(id).await?;
        tracing::info!(tag_id = %id, detached, "tag deleted");
        Ok(())
    }
}
