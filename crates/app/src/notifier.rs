//! Parent notifier: emails parents when their child is absent, late or
//! gets a disciplinary note.
//!
//! The notifier subscribes to the event bus and reacts to
//! [`EventKind::AbsenceRecorded`], [`EventKind::DelayRecorded`] and
//! [`EventKind::NoteRecorded`]. Producers put everything needed into the
//! event payload so no storage lookup happens here.

use tokio::sync::broadcast;

use casebook_domain::event::{Event, EventKind};

use crate::ports::{Mailer, Notice};

/// Background consumer turning attendance events into [`Notice`]s.
pub struct ParentNotifier<M> {
    mailer: M,
}

impl<M: Mailer> ParentNotifier<M> {
    pub fn new(mailer: M) -> Self {
        Self { mailer }
    }

    /// Build the notice for `event`, if it concerns parents.
    #[must_use]
    pub fn notice_for(event: &Event) -> Option<Notice> {
        let field = |name: &str| event.data.get(name).and_then(serde_json::Value::as_str);

        let to = field("parent_email")?;
        let student = field("student_name").unwrap_or("your child");
        let date = field("date").unwrap_or("today");

        let (subject, body) = match event.kind {
            EventKind::AbsenceRecorded => (
                format!("Absence of {student}"),
                format!("{student} was recorded as absent on {date}."),
            ),
            EventKind::DelayRecorded => {
                let minutes = event
                    .data
                    .get("minutes")
                    .and_then(serde_json::Value::as_u64)
                    .unwrap_or_default();
                (
                    format!("Late entry of {student}"),
                    format!("{student} entered {minutes} minutes late on {date}."),
                )
            }
            EventKind::NoteRecorded => (
                format!("Disciplinary note for {student}"),
                format!(
                    "{student} received a note on {date}: {}",
                    field("description").unwrap_or_default()
                ),
            ),
            _ => return None,
        };

        Some(Notice {
            to: to.to_string(),
            subject,
            body,
        })
    }

    /// Send the notice for `event`, logging delivery failures.
    pub async fn handle(&self, event: &Event) {
        let Some(notice) = Self::notice_for(event) else {
            return;
        };
        let to = notice.to.clone();
        match self.mailer.send(notice).await {
            Ok(()) => tracing::info!(event_id = %event.id, %to, "parent notified"),
            Err(err) => tracing::error!(event_id = %event.id, %to, %err, "failed to notify parent"),
        }
    }

    /// Consume events until the bus is closed.
    pub async fn run(self, mut events: broadcast::Receiver<Event>) {
        loop {
            match events.recv().await {
                Ok(event) => self.handle(&event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "parent notifier lagged, some events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!("event bus closed, parent notifier stopping");
                    break;
                }
            }
        }
    }
}
