//! Refreshment point: a restaurant or bar that advertises through banners.

use serde::{Deserialize, Serialize};

use crate::error::CasebookError;
use crate::id::RefreshmentPointId;
use crate::validation::Checks;

/// Banner capacity given to points that do not specify one.
pub const DEFAULT_MAX_BANNERS: u32 = 3;

/// Upper bound on the banner capacity of any point.
pub const MAX_BANNERS_LIMIT: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshmentPoint {
    pub id: RefreshmentPointId,
    pub name: String,
    pub address: String,
    pub max_banners: u32,
}

impl RefreshmentPoint {
    /// Create a point with the default banner capacity.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] listing every failed rule.
    pub fn new(name: &str, address: &str) -> Result<Self, CasebookError> {
        let point = Self {
            id: RefreshmentPointId::new(),
            name: name.trim().to_string(),
            address: address.trim().to_string(),
            max_banners: DEFAULT_MAX_BANNERS,
        };
        point.validate()?;
        Ok(point)
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
        if checks.required("address", &self.address) {
            checks.length("address", &self.address, 1, 200);
        }
        checks.range(
            "max_banners",
            i64::from(self.max_banners),
            1,
            i64::from(MAX_BANNERS_LIMIT),
        );
        Ok(checks.finish()?)
    }

    /// Replace the editable fields, keeping the capacity when none is given.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] and leaves the point untouched
    /// when the new values are invalid.
    pub fn apply(&mut self, details: &PointDetails) -> Result<(), CasebookError> {
        let updated = Self {
            id: self.id,
            name: details.name.trim().to_string(),
            address: details.address.trim().to_string(),
            max_banners: details.max_banners.unwrap_or(self.max_banners),
        };
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Case-insensitive substring match on name or address.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.address.to_lowercase().contains(&query)
    }
}

/// Editable fields of a refreshment point.
#[derive(Debug, Clone, Deserialize)]
pub struct PointDetails {
    pub name: String,
    pub address: String,
    /// Defaults to [`DEFAULT_MAX_BANNERS`] on creation.
    #[serde(default)]
    pub max_banners: Option<u32>,
}

impl PointDetails {
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] listing every failed rule.
    pub fn into_point(self) -> Result<RefreshmentPoint, CasebookError> {
        let mut point = RefreshmentPoint::new(&self.name, &self.address)?;
        point.apply(&self)?;
        Ok(point)
    }
}
