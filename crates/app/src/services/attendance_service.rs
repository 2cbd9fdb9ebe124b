//! Attendance service: daily registers, absences, delays and justifications.
//!
//! Saving a register merges it into what was recorded for that class and
//! day, then publishes one event per absence or delay that is new or
//! changed. The events carry the parent's address so the notifier can act
//! on them without a lookup.

use std::collections::HashMap;

use casebook_domain::attendance::{AttendanceKind, AttendanceRecord, DailyRegister, Justification};
use casebook_domain::error::{CasebookError, ConflictError, ValidationError};
use casebook_domain::event::{Event, EventKind};
use casebook_domain::id::{AttendanceRecordId, ClassId, StudentId};
use casebook_domain::student::Student;
use casebook_domain::time::Date;

use crate::ports::{
    AttendanceRepository, ClassRepository, EventPublisher, JustificationRepository,
    StudentRepository,
};

pub struct AttendanceService<S, P> {
    store: S,
    publisher: P,
}

impl<S, P> AttendanceService<S, P>
where
    S: ClassRepository + StudentRepository + AttendanceRepository + JustificationRepository,
    P: EventPublisher,
{
    pub fn new(store: S, publisher: P) -> Self {
        Self { store, publisher }
    }

    /// Store the register of a class for one day and return every record
    /// of that day.
    ///
    /// Saving the same register twice notifies parents once.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the class is missing,
    /// [`CasebookError::Validation`] when the register is dated after
    /// `today`, lists a student twice or lists a student of another class,
    /// or a storage error.
    pub async fn save_register(
        &self,
        register: &DailyRegister,
        today: Date,
    ) -> Result<Vec<AttendanceRecord>, CasebookError> {
        self.get_class(register.class_id).await?;
        register.validate(today)?;

        let students: HashMap<StudentId, Student> = self
            .store
            .students_in_class(register.class_id)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        if let Some(stranger) = register
            .entries
            .iter()
            .find(|e| !students.contains_key(&e.student_id))
        {
            tracing::warn!(class_id = %register.class_id, student_id = %stranger.student_id, "student not in class");
            return Err(ValidationError::Rule("every student must belong to the class").into());
        }

        let changed = self
            .store
            .merge_register(register.class_id, register.date, register.records())
            .await?;

        for record in &changed {
            let Some(student) = students.get(&record.student_id) else {
                continue;
            };
            self.publisher.publish(record_event(record, student)).await?;
        }
        let records = self
            .store
            .records_for_day(register.class_id, register.date)
            .await?;
        tracing::info!(
            class_id = %register.class_id,
            date = %register.date,
            recorded = records.len(),
            changed = changed.len(),
            "register saved"
        );
        Ok(records)
    }

    /// The register of a class for a day, every unrecorded student present.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the class is missing, or a
    /// storage error.
    pub async fn register_for(
        &self,
        class: ClassId,
        date: Date,
    ) -> Result<DailyRegister, CasebookError> {
        self.get_class(class).await?;
        let students: Vec<StudentId> = self
            .store
            .students_in_class(class)
            .await?
            .iter()
            .map(|s| s.id)
            .collect();
        let records = self.store.records_for_day(class, date).await?;
        Ok(DailyRegister::from_records(class, date, &students, &records))
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the student is missing, or a
    /// storage error.
    pub async fn student_records(
        &self,
        student: StudentId,
    ) -> Result<Vec<AttendanceRecord>, CasebookError> {
        self.get_student(student).await?;
        self.store.records_for_student(student).await
    }

    /// Justify an absence.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the record is missing,
    /// [`CasebookError::Validation`] when it is not an absence or the reason
    /// is invalid, [`ConflictError::AlreadyJustified`], or a storage error.
    pub async fn justify(
        &self,
        record: AttendanceRecordId,
        reason: &str,
        today: Date,
    ) -> Result<Justification, CasebookError> {
        let record = self.get_record(record).await?;
        let justification = Justification::new(&record, reason, today)?;
        if self
            .store
            .justification_for_record(record.id)
            .await?
            .is_some()
        {
            tracing::warn!(record_id = %record.id, "absence already justified");
            return Err(ConflictError::AlreadyJustified(record.id.to_string()).into());
        }

        let justification = self.store.create_justification(justification).await?;
        self.publisher
            .publish(Event::new(
                EventKind::JustificationInserted,
                Some(justification.id.as_uuid()),
                serde_json::json!({
                    "record_id": record.id,
                    "student_id": record.student_id,
                }),
            ))
            .await?;
        tracing::info!(justification_id = %justification.id, record_id = %record.id, "absence justified");
        Ok(justification)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the record has no
    /// justification, [`CasebookError::Validation`] for an invalid reason,
    /// or a storage error.
    pub async fn edit_justification(
        &self,
        record: AttendanceRecordId,
        reason: &str,
    ) -> Result<Justification, CasebookError> {
        let mut justification = self.justification_of(record).await?;
        justification.edit(reason)?;
        let justification = self.store.update_justification(justification).await?;
        tracing::info!(justification_id = %justification.id, "justification modified");
        Ok(justification)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the record has no
    /// justification, or a storage error.
    pub async fn delete_justification(
        &self,
        record: AttendanceRecordId,
    ) -> Result<(), CasebookError> {
        let justification = self.justification_of(record).await?;
        self.store.delete_justification(justification.id).await?;
        tracing::info!(justification_id = %justification.id, "justification deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the student is missing, or a
    /// storage error.
    pub async fn list_justifications(
        &self,
        student: StudentId,
    ) -> Result<Vec<Justification>, CasebookError> {
        self.get_student(student).await?;
        self.store.justifications_for_student(student).await
    }

    async fn get_class(&self, id: ClassId) -> Result<(), CasebookError> {
        match self.store.get_class(id).await? {
            Some(_) => Ok(()),
            None => Err(id.not_found().into()),
        }
    }

    async fn get_student(&self, id: StudentId) -> Result<Student, CasebookError> {
        self.store
            .get_student(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }

    async fn get_record(&self, id: AttendanceRecordId) -> Result<AttendanceRecord, CasebookError> {
        self.store
            .get_record(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }

    async fn justification_of(
        &self,
        record: AttendanceRecordId,
    ) -> Result<Justification, CasebookError> {
        self.get_record(record).await?;
        self.store
            .justification_for_record(record)
            .await?
            .ok_or_else(|| record.not_found().into())
    }
}

fn record_event(record: &AttendanceRecord, student: &Student) -> Event {
    let (kind, minutes) = match record.kind {
        AttendanceKind::Absence => (EventKind::AbsenceRecorded, None),
        AttendanceKind::Delay { minutes } => (EventKind::DelayRecorded, Some(minutes)),
    };
    Event::new(
        kind,
        Some(record.id.as_uuid()),
        serde_json::json!({
            "student_id": student.id,
            "student_name": student.full_name,
            "parent_email": student.parent_email,
            "class_id": record.class_id,
            "date": record.date,
            "minutes": minutes,
        }),
    )
}
