//! Time and calendar helpers.

use chrono::{DateTime, NaiveDate, Utc};

/// UTC timestamp used for `registered_at`, `published_at`, event times, etc.
pub type Timestamp = DateTime<Utc>;

/// Calendar day used by the school register.
pub type Date = NaiveDate;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Return the current UTC calendar day.
#[must_use]
pub fn today() -> Date {
    Utc::now().date_naive()
}
