//! Feedback: a tourist's vote and comment about a site.
//!
//! A tourist releases at most one feedback per site; the uniqueness rule
//! lives in the application service because it needs a repository lookup.

use serde::{Deserialize, Serialize};

use crate::error::{CasebookError, ValidationError};
use crate::id::{FeedbackId, SiteId, TouristId};
use crate::time::{Timestamp, now};
use crate::validation::Checks;

/// Longest accepted comment, in characters.
pub const COMMENT_MAX: usize = 1000;

/// Shortest accepted comment when editing an existing feedback.
pub const EDITED_COMMENT_MIN: usize = 5;

/// A vote between 1 and 5 stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Vote(u8);

impl Vote {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Vote {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(vote_out_of_range())
        }
    }
}

/// Votes arriving as plain JSON numbers may not even fit a byte.
impl TryFrom<i64> for Vote {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| vote_out_of_range())
            .and_then(Self::try_from)
    }
}

fn vote_out_of_range() -> ValidationError {
    ValidationError::Range {
        field: "vote",
        min: Vote::MIN.into(),
        max: Vote::MAX.into(),
    }
}

impl From<Vote> for u8 {
    fn from(vote: Vote) -> Self {
        vote.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub tourist_id: TouristId,
    pub site_id: SiteId,
    pub vote: Vote,
    pub comment: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Feedback {
    /// Create a feedback after checking the comment length.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] when the comment is too long.
    pub fn new(
        tourist_id: TouristId,
        site_id: SiteId,
        vote: Vote,
        comment: &str,
    ) -> Result<Self, CasebookError> {
        let comment = comment.trim();
        let mut checks = Checks::new();
        checks.length("comment", comment, 0, COMMENT_MAX);
        checks.finish()?;

        let ts = now();
        Ok(Self {
            id: FeedbackId::new(),
            tourist_id,
            site_id,
            vote,
            comment: comment.to_string(),
            created_at: ts,
            updated_at: ts,
        })
    }

    /// Replace the comment.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] unless the trimmed comment has
    /// between [`EDITED_COMMENT_MIN`] and [`COMMENT_MAX`] characters.
    pub fn edit_comment(&mut self, comment: &str, at: Timestamp) -> Result<(), CasebookError> {
        let comment = comment.trim();
        let mut checks = Checks::new();
        checks.length("comment", comment, EDITED_COMMENT_MIN, COMMENT_MAX);
        checks.finish()?;
        self.comment = comment.to_string();
        self.updated_at = at;
        Ok(())
    }
}

/// Aggregated votes of one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRating {
    pub site_id: SiteId,
    pub votes: usize,
    /// `None` when nobody voted yet.
    pub average: Option<f64>,
}

impl SiteRating {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_feedback(site_id: SiteId, feedback: &[Feedback]) -> Self {
        let votes = feedback.len();
        let total: u32 = feedback.iter().map(|f| u32::from(f.vote.value())).sum();
        let average = (votes > 0).then(|| f64::from(total) / votes as f64);
        Self {
            site_id,
            votes,
            average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(value: u8) -> Vote {
        Vote::try_from(value).unwrap()
    }

    #[test]
    fn should_reject_vote_out_of_range() {
        assert!(Vote::try_from(0_u8).is_err());
        assert!(Vote::try_from(6_u8).is_err());
        assert_eq!(vote(5).value(), 5);
    }

    #[test]
    fn should_deserialize_vote_with_range_check() {
        assert!(serde_json::from_str::<Vote>("3").is_ok());
        assert!(serde_json::from_str::<Vote>("9").is_err());
    }

    #[test]
    fn should_accept_empty_comment_on_insert() {
        let feedback = Feedback::new(TouristId::new(), SiteId::new(), vote(4), "  ").unwrap();
        assert_eq!(feedback.comment, "");
    }

    #[test]
    fn should_reject_comment_longer_than_limit() {
        let long = "x".repeat(COMMENT_MAX + 1);
        let result = Feedback::new(TouristId::new(), SiteId::new(), vote(4), &long);
        assert!(matches!(result, Err(CasebookError::Validation(_))));
    }

    #[test]
    fn should_reject_too_short_edited_comment() {
        let mut feedback = Feedback::new(TouristId::new(), SiteId::new(), vote(4), "ok").unwrap();
        let result = feedback.edit_comment("meh", now());
        assert!(matches!(
            result,
            Err(CasebookError::Validation(ValidationError::Length { .. }))
        ));
        assert_eq!(feedback.comment, "ok");
    }

    #[test]
    fn should_update_comment_and_timestamp_when_edited() {
        let mut feedback = Feedback::new(TouristId::new(), SiteId::new(), vote(4), "ok").unwrap();
        let later = feedback.updated_at + chrono::Duration::seconds(5);
        feedback.edit_comment("  Wonderful guided tour  ", later).unwrap();
        assert_eq!(feedback.comment, "Wonderful guided tour");
        assert_eq!(feedback.updated_at, later);
    }

    #[test]
    fn should_average_votes() {
        let site = SiteId::new();
        let all = vec![
            Feedback::new(TouristId::new(), site, vote(5), "").unwrap(),
            Feedback::new(TouristId::new(), site, vote(2), "").unwrap(),
        ];
        let rating = SiteRating::from_feedback(site, &all);
        assert_eq!(rating.votes, 2);
        assert_eq!(rating.average, Some(3.5));
    }

    #[test]
    fn should_have_no_average_without_votes() {
        let rating = SiteRating::from_feedback(SiteId::new(), &[]);
        assert_eq!(rating.average, None);
    }

    #[test]
    fn should_reject_vote_when_number_does_not_fit_a_byte() {
        assert!(matches!(
            Vote::try_from(300_i64),
            Err(ValidationError::Range { field: "vote", min: 1, max: 5 })
        ));
        assert!(Vote::try_from(-1_i64).is_err());
        assert_eq!(Vote::try_from(4_i64).map(Vote::value), Ok(4));
    }
}
