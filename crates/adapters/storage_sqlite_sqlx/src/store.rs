//! The `SQLite`-backed store and the row decoding helpers shared by the
//! repository implementations.
//!
//! Identifiers, timestamps and calendar days are stored as text: UUIDs in
//! their hyphenated form, timestamps as RFC 3339 and days as `YYYY-MM-DD`.

use std::str::FromStr;

use sqlx::SqlitePool;

use casebook_domain::time::{Date, Timestamp};

/// `SQLite`-backed store implementing every repository port.
///
/// Cloning is cheap: clones share the same connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    pub(crate) pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(crate) fn decode_err<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

pub(crate) fn parse_id<T>(value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(value).map_err(decode_err)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.to_utc())
        .map_err(decode_err)
}

pub(crate) fn parse_date(value: &str) -> Result<Date, sqlx::Error> {
    Date::from_str(value).map_err(decode_err)
}
