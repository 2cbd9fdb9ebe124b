//! Typed identifier newtypes backed by UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotFoundError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident => $kind:literal) => {
        $(#[doc = $doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Name of the identified entity, used in error messages.
            pub const KIND: &'static str = $kind;

            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }

            /// Build the error returned when nothing carries this identifier.
            #[must_use]
            pub fn not_found(self) -> NotFoundError {
                NotFoundError {
                    entity: $kind,
                    id: self.0.to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for an eTour [`Tourist`](crate::tourist::Tourist).
    TouristId => "Tourist"
);

define_id!(
    /// Unique identifier for a cultural heritage [`Site`](crate::site::Site).
    SiteId => "Site"
);

define_id!(
    /// Unique identifier for a [`Feedback`](crate::feedback::Feedback).
    FeedbackId => "Feedback"
);

define_id!(
    /// Unique identifier for a [`RefreshmentPoint`](crate::refreshment_point::RefreshmentPoint).
    RefreshmentPointId => "RefreshmentPoint"
);

define_id!(
    /// Unique identifier for a [`Banner`](crate::banner::Banner).
    BannerId => "Banner"
);

define_id!(
    /// Unique identifier for a search [`Tag`](crate::tag::Tag).
    TagId => "Tag"
);

define_id!(
    /// Unique identifier for a SMOS [`User`](crate::user::User).
    UserId => "User"
);

define_id!(
    /// Unique identifier for an [`AcademicYear`](crate::academic_year::AcademicYear).
    AcademicYearId => "AcademicYear"
);

define_id!(
    /// Unique identifier for a [`SchoolClass`](crate::school_class::SchoolClass).
    ClassId => "Class"
);

define_id!(
    /// Unique identifier for a [`Student`](crate::student::Student).
    StudentId => "Student"
);

define_id!(
    /// Unique identifier for an [`AttendanceRecord`](crate::attendance::AttendanceRecord).
    AttendanceRecordId => "AttendanceRecord"
);

define_id!(
    /// Unique identifier for a [`Justification`](crate::attendance::Justification).
    JustificationId => "Justification"
);

define_id!(
    /// Unique identifier for a [`ReportCard`](crate::report_card::ReportCard).
    ReportCardId => "ReportCard"
);

define_id!(
    /// Unique identifier for a disciplinary [`Note`](crate::note::Note).
    NoteId => "Note"
);

define_id!(
    /// Unique identifier for a [`Teaching`](crate::curriculum::Teaching).
    TeachingId => "Teaching"
);

define_id!(
    /// Unique identifier for a study [`Address`](crate::curriculum::Address).
    AddressId => "Address"
);

define_id!(
    /// Unique identifier for an [`EnrollmentRequest`](crate::enrollment::EnrollmentRequest).
    EnrollmentRequestId => "EnrollmentRequest"
);

define_id!(
    /// Unique identifier for a [`Convention`](crate::convention::Convention).
    ConventionId => "Convention"
);

define_id!(
    /// Unique identifier for an [`Event`](crate::event::Event).
    EventId => "Event"
);
