//! # casebook-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `casebook-app::ports`
//!   on a single [`SqliteStore`]
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `casebook-app` (for port traits) and `casebook-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod pool;
pub mod store;

mod attendance_repo;
mod convention_repo;
mod curriculum_repo;
mod enrollment_repo;
mod feedback_repo;
mod note_repo;
mod point_repo;
mod report_card_repo;
mod school_repo;
mod site_repo;
mod tag_repo;
mod tourist_repo;
mod user_repo;

pub use pool::{Config, Database};
pub use store::SqliteStore;
