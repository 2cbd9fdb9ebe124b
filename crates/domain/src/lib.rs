//! # casebook-domain
//!
//! Pure domain model for casebook, the eTour and SMOS use cases.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - A validation toolkit that reports every failed rule of a form
//! - **eTour** entities: tourists, cultural sites, feedback, refreshment
//!   points with their banners and conventions, search tags
//! - **SMOS** entities: users and roles, enrollment requests, academic
//!   years, classes, students, teachings and addresses, attendance,
//!   disciplinary notes and report cards
//! - **Events** published after state changes
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;
pub mod validation;

pub mod credential;
pub mod event;

pub mod banner;
pub mod convention;
pub mod feedback;
pub mod refreshment_point;
pub mod site;
pub mod tag;
pub mod tourist;

pub mod academic_year;
pub mod attendance;
pub mod curriculum;
pub mod enrollment;
pub mod note;
pub mod report_card;
pub mod school_class;
pub mod student;
pub mod user;
