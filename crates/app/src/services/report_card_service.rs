//! Report card service: publishing and consulting term grades.

use casebook_domain::error::{CasebookError, NotFoundError};
use casebook_domain::event::{Event, EventKind};
use casebook_domain::id::{AcademicYearId, StudentId};
use casebook_domain::report_card::{ReportCard, ReportCardForm, Term};

use crate::ports::{
    AcademicYearRepository, EventPublisher, ReportCardRepository, StudentRepository,
};

pub struct ReportCardService<S, P> {
    store: S,
    publisher: P,
}

impl<S, P> ReportCardService<S, P>
where
    S: StudentRepository + AcademicYearRepository + ReportCardRepository,
    P: EventPublisher,
{
    pub fn new(store: S, publisher: P) -> Self {
        Self { store, publisher }
    }

    /// Publish a student's report card, replacing an earlier one for the
    /// same academic year and term.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the student or academic year
    /// is missing, [`CasebookError::Validation`] listing every failed rule,
    /// or a storage error.
    pub async fn publish(
        &self,
        student: StudentId,
        form: &ReportCardForm,
    ) -> Result<ReportCard, CasebookError> {
        self.ensure_student(student).await?;
        if self
            .store
            .get_academic_year(form.academic_year_id)
            .await?
            .is_none()
        {
            return Err(form.academic_year_id.not_found().into());
        }
        let card = ReportCard::new(student, form)?;

        let card = self.store.upsert_report_card(card).await?;
        self.publisher
            .publish(Event::new(
                EventKind::ReportCardPublished,
                Some(card.id.as_uuid()),
                serde_json::json!({
                    "student_id": student,
                    "academic_year_id": card.academic_year_id,
                    "term": card.term,
                }),
            ))
            .await?;
        tracing::info!(report_card_id = %card.id, student_id = %student, term = %card.term, "report card published");
        Ok(card)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when no card was published for
    /// that student, year and term, or a storage error.
    pub async fn get(
        &self,
        student: StudentId,
        year: AcademicYearId,
        term: Term,
    ) -> Result<ReportCard, CasebookError> {
        self.ensure_student(student).await?;
        self.store
            .find_report_card(student, year, term)
            .await?
            .ok_or_else(|| {
                NotFoundError {
                    entity: "ReportCard",
                    id: format!("{student}/{year}/{term}"),
                }
                .into()
            })
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the student is missing, or a
    /// storage error.
    pub async fn list_for_student(
        &self,
        student: StudentId,
    ) -> Result<Vec<ReportCard>, CasebookError> {
        self.ensure_student(student).await?;
        self.store.report_cards_for_student(student).await
    }

    async fn ensure_student(&self, id: StudentId) -> Result<(), CasebookError> {
        match self.store.get_student(id).await? {
            Some(_) => Ok(()),
            None => Err(id.not_found().into()),
        }
    }
}
