//! Convention: an agreement between a refreshment point and a tourist agency.
//!
//! A point operator requests a convention for a period. It stays pending
//! until an agency operator activates it. A point never has two active
//! conventions covering the same day.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CasebookError, ValidationError};
use crate::id::{ConventionId, RefreshmentPointId};
use crate::time::{Date, Timestamp, now};
use crate::validation::Checks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConventionStatus {
    Pending,
    Active,
}

impl ConventionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for ConventionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConventionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            _ => Err(ValidationError::Format { field: "status" }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Convention {
    pub id: ConventionId,
    pub point_id: RefreshmentPointId,
    /// Name of the agency the point signs with.
    pub agency: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: ConventionStatus,
    pub requested_at: Timestamp,
    pub activated_at: Option<Timestamp>,
}

/// Terms a refreshment point asks for.
#[derive(Debug, Clone, Deserialize)]
pub struct ConventionRequest {
    pub agency: String,
    pub start_date: Date,
    pub end_date: Date,
}

impl Convention {
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] listing every failed rule: a
    /// blank or overlong agency, a period ending before it starts, or a
    /// period already over by `today`.
    pub fn request(
        point_id: RefreshmentPointId,
        request: &ConventionRequest,
        today: Date,
    ) -> Result<Self, CasebookError> {
        let agency = request.agency.trim();
        let mut checks = Checks::new();
        if checks.required("agency", agency) {
            checks.length("agency", agency, 1, 100);
        }
        checks
            .ensure(
                request.start_date <= request.end_date,
                ValidationError::Rule("a convention cannot end before it starts"),
            )
            .ensure(
                request.end_date >= today,
                ValidationError::Rule("a convention cannot end in the past"),
            );
        checks.finish()?;

        Ok(Self {
            id: ConventionId::new(),
            point_id,
            agency: agency.to_string(),
            start_date: request.start_date,
            end_date: request.end_date,
            status: ConventionStatus::Pending,
            requested_at: now(),
            activated_at: None,
        })
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ConventionStatus::Pending
    }

    /// Whether both conventions cover at least one common day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::Rule`] when the period ended before `today`.
    pub fn activate(&mut self, today: Date) -> Result<(), ValidationError> {
        if self.end_date < today {
            return Err(ValidationError::Rule("the convention period is already over"));
        }
        self.status = ConventionStatus::Active;
        self.activated_at = Some(now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(month: u32, d: u32) -> Date {
        Date::from_ymd_opt(2025, month, d).unwrap()
    }

    fn request(start: Date, end: Date) -> ConventionRequest {
        ConventionRequest {
            agency: "Amalfi Tours".to_string(),
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn should_start_pending() {
        let convention =
            Convention::request(RefreshmentPointId::new(), &request(day(6, 1), day(9, 30)), day(5, 1))
                .unwrap();
        assert!(convention.is_pending());
        assert!(convention.activated_at.is_none());
    }

    #[test]
    fn should_reject_request_when_period_is_reversed_and_over() {
        let err = Convention::request(
            RefreshmentPointId::new(),
            &request(day(4, 10), day(4, 1)),
            day(5, 1),
        )
        .unwrap_err();
        assert!(matches!(err, CasebookError::Validation(ValidationError::Many(ref f)) if f.len() == 2));
    }

    #[test]
    fn should_detect_overlap_when_periods_share_a_day() {
        let point = RefreshmentPointId::new();
        let summer = Convention::request(point, &request(day(6, 1), day(8, 31)), day(5, 1)).unwrap();
        let autumn = Convention::request(point, &request(day(8, 31), day(11, 30)), day(5, 1)).unwrap();
        let winter = Convention::request(point, &request(day(12, 1), day(12, 31)), day(5, 1)).unwrap();
        assert!(summer.overlaps(&autumn));
        assert!(!summer.overlaps(&winter));
    }

    #[test]
    fn should_refuse_activation_when_period_is_over() {
        let mut convention =
            Convention::request(RefreshmentPointId::new(), &request(day(6, 1), day(6, 30)), day(5, 1))
                .unwrap();
        assert!(convention.activate(day(7, 1)).is_err());
        convention.activate(day(6, 15)).unwrap();
        assert_eq!(convention.status, ConventionStatus::Active);
    }
}
