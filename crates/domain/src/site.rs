//! Site: a cultural heritage object tourists can visit and review.

use serde::{Deserialize, Serialize};

use crate::error::CasebookError;
use crate::id::{SiteId, TagId};
use crate::time::{Timestamp, now};
use crate::validation::Checks;

/// A cultural heritage object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub location: String,
    pub description: String,
    pub tags: Vec<TagId>,
    pub created_at: Timestamp,
}

impl Site {
    /// Create a builder for constructing a [`Site`].
    #[must_use]
    pub fn builder() -> SiteBuilder {
        SiteBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] listing every failed rule.
    pub fn validate(&self) -> Result<(), CasebookError> {
        let mut checks = Checks::new();
        if checks.required("name", &self.name) {
            checks.length("name", &self.name, 1, 100);
        }
        if checks.required("location", &self.location) {
            checks.length("location", &self.location, 1, 100);
        }
        checks.length("description", &self.description, 0, 2000);
        Ok(checks.finish()?)
    }

    /// Replace the descriptive fields, keeping identity and tags.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] and leaves the site untouched
    /// when the new values are invalid.
    pub fn apply(&mut self, details: &SiteDetails) -> Result<(), CasebookError> {
        let mut updated = self.clone();
        updated.name = details.name.trim().to_string();
        updated.location = details.location.trim().to_string();
        updated.description = details.description.trim().to_string();
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Attach a tag. Returns `false` when it was already attached.
    pub fn tag(&mut self, tag: TagId) -> bool {
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Detach a tag. Returns `false` when it was not attached.
    pub fn untag(&mut self, tag: TagId) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| *t != tag);
        before != self.tags.len()
    }
}

/// Step-by-step builder for [`Site`].
#[derive(Debug, Default)]
pub struct SiteBuilder {
    id: Option<SiteId>,
    name: Option<String>,
    location: Option<String>,
    description: Option<String>,
    tags: Vec<TagId>,
}

impl SiteBuilder {
    #[must_use]
    pub fn id(mut self, id: SiteId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: TagId) -> Self {
        self.tags.push(tag);
        self
    }

    /// Consume the builder, validate, and return a [`Site`].
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] if `name` or `location` is
    /// missing, or a field is too long.
    pub fn build(self) -> Result<Site, CasebookError> {
        let site = Site {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default().trim().to_string(),
            location: self.location.unwrap_or_default().trim().to_string(),
            description: self.description.unwrap_or_default().trim().to_string(),
            tags: self.tags,
            created_at: now(),
        };
        site.validate()?;
        Ok(site)
    }
}

/// Descriptive fields entered by an agency operator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteDetails {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
}

impl SiteDetails {
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] listing every failed rule.
    pub fn into_site(self) -> Result<Site, CasebookError> {
        Site::builder()
            .name(self.name)
            .location(self.location)
            .description(self.description)
            .build()
    }
}

/// Search criteria for sites. An empty query matches every site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteQuery {
    /// Case-insensitive substring of the name, location or description.
    pub keyword: Option<String>,
    pub tag: Option<TagId>,
}

impl SiteQuery {
    #[must_use]
    pub fn matches(&self, site: &Site) -> bool {
        let keyword_ok = match self.keyword.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(keyword) => {
                let keyword = keyword.to_lowercase();
                [&site.name, &site.location, &site.description]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&keyword))
            }
        };
        let tag_ok = self.tag.is_none_or(|tag| site.tags.contains(&tag));
        keyword_ok && tag_ok
    }
}
