//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod event_bus;
pub mod mailer;
pub mod school;
pub mod tourism;

pub use event_bus::EventPublisher;
pub use mailer::{Mailer, Notice};
pub use school::{
    AcademicYearRepository, AddressRepository, AttendanceRepository, ClassRepository,
    EnrollmentRequestRepository, JustificationRepository, NoteRepository, ReportCardRepository,
    StudentRepository, TeachingRepository, UserRepository,
};
pub use tourism::{
    BannerRepository, ConventionRepository, FeedbackRepository, RefreshmentPointRepository,
    SiteRepository, TagRepository, TouristRepository,
};

/// A storage backend implementing every repository port.
///
/// Implemented automatically for any type that implements all of them, so
/// adapters only implement the individual repositories.
pub trait Store:
    TouristRepository
    + SiteRepository
    + FeedbackRepository
    + RefreshmentPointRepository
    + BannerRepository
    + ConventionRepository
    + TagRepository
    + UserRepository
    + EnrollmentRequestRepository
    + AcademicYearRepository
    + ClassRepository
    + StudentRepository
    + AttendanceRepository
    + JustificationRepository
    + ReportCardRepository
    + NoteRepository
    + TeachingRepository
    + AddressRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> Store for T where
    T: TouristRepository
        + SiteRepository
        + FeedbackRepository
        + RefreshmentPointRepository
        + BannerRepository
        + ConventionRepository
        + TagRepository
        + UserRepository
        + EnrollmentRequestRepository
        + AcademicYearRepository
        + ClassRepository
        + StudentRepository
        + AttendanceRepository
        + JustificationRepository
        + ReportCardRepository
        + NoteRepository
        + TeachingRepository
        + AddressRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
