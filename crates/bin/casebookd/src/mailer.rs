//! Mailer that writes each notice to the log instead of sending it.

use std::future::Future;

use casebook_app::ports::{Mailer, Notice};
use casebook_domain::error::CasebookError;

pub struct TracingMailer {
    sender: String,
}

impl TracingMailer {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

impl Mailer for TracingMailer {
    fn send(&self, notice: Notice) -> impl Future<Output = Result<(), CasebookError>> + Send {
        tracing::info!(
            from = %self.sender,
            to = %notice.to,
            subject = %notice.subject,
            body = %notice.body,
            "notice delivered"
        );
        async { Ok(()) }
    }
}
