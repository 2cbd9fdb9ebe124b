//! Mailer port: outbound email delivery.

use std::future::Future;

use casebook_domain::error::CasebookError;

/// A message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivers [`Notice`]s.
pub trait Mailer {
    fn send(&self, notice: Notice) -> impl Future<Output = Result<(), CasebookError>> + Send;
}
