//! Event: an immutable record of something that happened.
//!
//! Services publish events after a change has been stored. Consumers such as
//! the parent notifier react to them without the producer knowing.

use serde::{Deserialize, Serialize};

use crate::id::EventId;
use crate::time::{Timestamp, now};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TouristRegistered,
    FeedbackInserted,
    FeedbackModified,
    BannerInserted,
    AbsenceRecorded,
    DelayRecorded,
    JustificationInserted,
    ReportCardPublished,
    NoteRecorded,
    ConventionRequested,
    ConventionActivated,
}

impl EventKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TouristRegistered => "tourist_registered",
            Self::FeedbackInserted => "feedback_inserted",
            Self::FeedbackModified => "feedback_modified",
            Self::BannerInserted => "banner_inserted",
            Self::AbsenceRecorded => "absence_recorded",
            Self::DelayRecorded => "delay_recorded",
            Self::JustificationInserted => "justification_inserted",
            Self::ReportCardPublished => "report_card_published",
            Self::NoteRecorded => "note_recorded",
            Self::ConventionRequested => "convention_requested",
            Self::ConventionActivated => "convention_activated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub kind: EventKind,
    /// Identifier of the entity the event is about.
    pub subject_id: Option<uuid::Uuid>,
    pub timestamp: Timestamp,
    /// Kind-specific payload.
    pub data: serde_json::Value,
}

impl Event {
    #[must_use]
    pub fn new(kind: EventKind, subject_id: Option<uuid::Uuid>, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            kind,
            subject_id,
            timestamp: now(),
            data,
        }
    }
}
