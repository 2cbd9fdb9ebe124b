//! # casebook-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - one repository per aggregate (`TouristRepository`, `SiteRepository`,
//!     `AttendanceRepository`, ...), gathered by the [`ports::Store`] supertrait
//!   - `EventPublisher`: publish domain events
//!   - `Mailer`: deliver a notice to an email address
//! - Define **driving/inbound ports** as use-case structs:
//!   - eTour: `TouristService`, `SiteService`, `FeedbackService`,
//!     `BannerService`, `TagService`
//!   - SMOS: `UserService`, `SchoolService`, `AttendanceService`,
//!     `ReportCardService`
//! - Provide **in-process infrastructure** that doesn't need IO: the event bus
//!   and the parent notifier listening on it
//!
//! ## Dependency rule
//! Depends on `casebook-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod notifier;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
