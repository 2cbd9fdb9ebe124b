//! Tourist: a registered eTour account.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::credential::PasswordDigest;
use crate::error::{CasebookError, ValidationError};
use crate::id::{TagId, TouristId};
use crate::site::Site;
use crate::time::{Timestamp, now};
use crate::validation::{Checks, USERNAME};

/// A registered eTour account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tourist {
    pub id: TouristId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing, default)]
    pub password: PasswordDigest,
    pub registered_at: Timestamp,
}

impl Tourist {
    /// Validate a registration form and create the account it describes.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] listing every failed rule.
    pub fn register(form: &RegistrationForm) -> Result<Self, CasebookError> {
        form.validate()?;
        Ok(Self {
            id: TouristId::new(),
            username: form.username.trim().to_string(),
            email: form.email.trim().to_lowercase(),
            full_name: form.full_name.trim().to_string(),
            password: PasswordDigest::derive(&form.password),
            registered_at: now(),
        })
    }

    /// Apply a validated profile change.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] when the new values are invalid.
    pub fn apply(&mut self, update: &ProfileUpdate) -> Result<(), CasebookError> {
        update.validate()?;
        self.email = update.email.trim().to_lowercase();
        self.full_name = update.full_name.trim().to_string();
        Ok(())
    }

    /// Case-insensitive substring match on username or full name.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.username.to_lowercase().contains(&query)
            || self.full_name.to_lowercase().contains(&query)
    }
}

/// Data submitted by a guest user to create an account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
}

impl RegistrationForm {
    /// Check every field, reporting all failures at once.
    ///
    /// # Errors
    ///
    /// Returns the failed rules as a [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::new();
        if checks.required("username", &self.username) {
            checks.matches("username", self.username.trim(), &USERNAME);
        }
        checks
            .email("email", &self.email)
            .new_password(&self.password, &self.confirm_password)
            .full_name(&self.full_name);
        checks.finish()
    }
}

/// Editable profile fields of a tourist.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub email: String,
    pub full_name: String,
}

impl ProfileUpdate {
    /// # Errors
    ///
    /// Returns the failed rules as a [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::new();
        checks
            .email("email", &self.email)
            .full_name(&self.full_name);
        checks.finish()
    }
}

/// Password change request.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChange {
    /// # Errors
    ///
    /// Returns the failed rules of the new password as a [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::new();
        checks.new_password(&self.new_password, &self.confirm_password);
        checks.finish()
    }
}

/// Most tags a tourist can prefer at once.
pub const MAX_PREFERRED_TAGS: usize = 10;

/// The tags a tourist wants searches and suggestions to favour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPreferences {
    pub tags: BTreeSet<TagId>,
}

impl SearchPreferences {
    /// # Errors
    ///
    /// Returns [`ValidationError::Range`] when more than
    /// [`MAX_PREFERRED_TAGS`] tags are given.
    pub fn new(tags: BTreeSet<TagId>) -> Result<Self, ValidationError> {
        if tags.len() > MAX_PREFERRED_TAGS {
            return Err(ValidationError::Range {
                field: "tags",
                min: 0,
                max: i64::try_from(MAX_PREFERRED_TAGS).unwrap_or(i64::MAX),
            });
        }
        Ok(Self { tags })
    }

    /// Whether `site` carries at least one preferred tag.
    #[must_use]
    pub fn suits(&self, site: &Site) -> bool {
        site.tags.iter().any(|tag| self.tags.contains(tag))
    }
}
