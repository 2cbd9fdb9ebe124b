//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod attendance_service;
pub mod banner_service;
pub mod convention_service;
pub mod curriculum_service;
pub mod feedback_service;
pub mod note_service;
pub mod report_card_service;
pub mod school_service;
pub mod site_service;
pub mod tag_service;
pub mod tourist_service;
pub mod user_service;
