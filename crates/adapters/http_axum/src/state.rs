//! Shared application state for axum handlers.

use std::sync::Arc;

use casebook_app::ports::{EventPublisher, Store};
use casebook_app::services::attendance_service::AttendanceService;
use casebook_app::services::banner_service::BannerService;
use casebook_app::services::convention_service::ConventionService;
use casebook_app::services::curriculum_service::CurriculumService;
use casebook_app::services::feedback_service::FeedbackService;
use casebook_app::services::note_service::NoteService;
use casebook_app::services::report_card_service::ReportCardService;
use casebook_app::services::school_service::SchoolService;
use casebook_app::services::site_service::SiteService;
use casebook_app::services::tag_service::TagService;
use casebook_app::services::tourist_service::TouristService;
use casebook_app::services::user_service::UserService;

/// An event publisher that can be handed to every service.
pub trait Publisher: EventPublisher + Clone + Send + Sync + 'static {}

impl<T> Publisher for T where T: EventPublisher + Clone + Send + Sync + 'static {}

/// Application state shared across all axum handlers.
///
/// Generic over the storage backend and the event publisher to avoid
/// dynamic dispatch. `Clone` is implemented manually so only the `Arc`
/// wrappers are cloned.
pub struct AppState<S, P> {
    pub tourists: Arc<TouristService<S, P>>,
    pub sites: Arc<SiteService<S>>,
    pub feedback: Arc<FeedbackService<S, P>>,
    /// Refreshment points and their banners.
    pub banners: Arc<BannerService<S, P>>,
    pub conventions: Arc<ConventionService<S, P>>,
    pub tags: Arc<TagService<S>>,
    pub users: Arc<UserService<S>>,
    /// Academic years, classes and students.
    pub school: Arc<SchoolService<S>>,
    pub attendance: Arc<AttendanceService<S, P>>,
    pub report_cards: Arc<ReportCardService<S, P>>,
    pub notes: Arc<NoteService<S, P>>,
    /// Teachings and study addresses.
    pub curriculum: Arc<CurriculumService<S>>,
}

impl<S, P> Clone for AppState<S, P> {
    fn clone(&self) -> Self {
        Self {
            tourists: Arc::clone(&self.tourists),
            sites: Arc::clone(&self.sites),
            feedback: Arc::clone(&self.feedback),
            banners: Arc::clone(&self.banners),
            conventions: Arc::clone(&self.conventions),
            tags: Arc::clone(&self.tags),
            users: Arc::clone(&self.users),
            school: Arc::clone(&self.school),
            attendance: Arc::clone(&self.attendance),
            report_cards: Arc::clone(&self.report_cards),
            notes: Arc::clone(&self.notes),
            curriculum: Arc::clone(&self.curriculum),
        }
    }
}

impl<S: Store, P: Publisher> AppState<S, P> {
    /// Build every service on top of one store and one publisher.
    pub fn new(store: S, publisher: P) -> Self {
        Self {
            tourists: Arc::new(TouristService::new(store.clone(), publisher.clone())),
            sites: Arc::new(SiteService::new(store.clone())),
            feedback: Arc::new(FeedbackService::new(store.clone(), publisher.clone())),
            banners: Arc::new(BannerService::new(store.clone(), publisher.clone())),
            conventions: Arc::new(ConventionService::new(store.clone(), publisher.clone())),
            tags: Arc::new(TagService::new(store.clone())),
            users: Arc::new(UserService::new(store.clone())),
            school: Arc::new(SchoolService::new(store.clone())),
            attendance: Arc::new(AttendanceService::new(store.clone(), publisher.clone())),
            report_cards: Arc::new(ReportCardService::new(store.clone(), publisher.clone())),
            notes: Arc::new(NoteService::new(store.clone(), publisher)),
            curriculum: Arc::new(CurriculumService::new(store)),
        }
    }
}
