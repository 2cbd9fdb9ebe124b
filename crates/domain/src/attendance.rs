//! Attendance: the daily register of a class and the records it produces.
//!
//! A teacher fills in a [`DailyRegister`] for one class and one day. Every
//! student who is not present turns into an [`AttendanceRecord`], which a
//! parent may later explain with a [`Justification`] when it is an absence.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{CasebookError, ValidationError};
use crate::id::{AttendanceRecordId, ClassId, JustificationId, StudentId};
use crate::time::Date;
use crate::validation::Checks;

/// Longest delay that can be recorded, in minutes.
pub const MAX_DELAY_MINUTES: u16 = 240;

/// Longest accepted justification reason, in characters.
pub const REASON_MAX: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttendanceKind {
    Absence,
    Delay { minutes: u16 },
}

impl AttendanceKind {
    #[must_use]
    pub fn is_absence(self) -> bool {
        matches!(self, Self::Absence)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: AttendanceRecordId,
    pub student_id: StudentId,
    pub class_id: ClassId,
    pub date: Date,
    pub kind: AttendanceKind,
}

/// How a student showed up on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegisterStatus {
    Present,
    Absent,
    Late { minutes: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterEntry {
    pub student_id: StudentId,
    #[serde(flatten)]
    pub status: RegisterStatus,
}

/// The attendance sheet of one class for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRegister {
    pub class_id: ClassId,
    pub date: Date,
    pub entries: Vec<RegisterEntry>,
}

impl DailyRegister {
    /// Check the register against the calendar and itself.
    ///
    /// # Errors
    ///
    /// Returns every failed rule: a date after `today`, a student listed
    /// twice, or a delay outside 1..=[`MAX_DELAY_MINUTES`].
    pub fn validate(&self, today: Date) -> Result<(), ValidationError> {
        let mut checks = Checks::new();
        checks.ensure(
            self.date <= today,
            ValidationError::Rule("register date cannot be in the future"),
        );

        let mut seen = HashSet::with_capacity(self.entries.len());
        let mut duplicated = false;
        for entry in &self.entries {
            if !seen.insert(entry.student_id) {
                duplicated = true;
            }
            if let RegisterStatus::Late { minutes } = entry.status {
                checks.range(
                    "minutes",
                    minutes.into(),
                    1,
                    MAX_DELAY_MINUTES.into(),
                );
            }
        }
        checks.ensure(
            !duplicated,
            ValidationError::Rule("a student appears more than once in the register"),
        );
        checks.finish()
    }

    /// Records for every student who was not present.
    #[must_use]
    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let kind = match entry.status {
                    RegisterStatus::Present => return None,
                    RegisterStatus::Absent => AttendanceKind::Absence,
                    RegisterStatus::Late { minutes } => AttendanceKind::Delay { minutes },
                };
                Some(AttendanceRecord {
                    id: AttendanceRecordId::new(),
                    student_id: entry.student_id,
                    class_id: self.class_id,
                    date: self.date,
                    kind,
                })
            })
            .collect()
    }

    /// Rebuild the register of a day from the stored records, marking every
    /// other student of the class as present.
    #[must_use]
    pub fn from_records(
        class_id: ClassId,
        date: Date,
        students: &[StudentId],
        records: &[AttendanceRecord],
    ) -> Self {
        let entries = students
            .iter()
            .map(|student_id| {
                let status = records
                    .iter()
                    .find(|record| record.student_id == *student_id)
                    .map_or(RegisterStatus::Present, |record| match record.kind {
                        AttendanceKind::Absence => RegisterStatus::Absent,
                        AttendanceKind::Delay { minutes } => RegisterStatus::Late { minutes },
                    });
                RegisterEntry {
                    student_id: *student_id,
                    status,
                }
            })
            .collect();
        Self {
            class_id,
            date,
            entries,
        }
    }
}

/// One stored record touched by a register save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordChange {
    Insert(AttendanceRecord),
    /// Same row and id, new kind.
    Update(AttendanceRecord),
}

impl RecordChange {
    #[must_use]
    pub fn record(&self) -> &AttendanceRecord {
        match self {
            Self::Insert(record) | Self::Update(record) => record,
        }
    }
}

/// What saving a register does to the records already stored for its class
/// and day. Unchanged records keep their row, their id and any
/// justification attached to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterDiff {
    /// In register order.
    pub changes: Vec<RecordChange>,
    /// Records of students who are now present.
    pub removed: Vec<AttendanceRecordId>,
}

impl RegisterDiff {
    #[must_use]
    pub fn between(stored: &[AttendanceRecord], incoming: Vec<AttendanceRecord>) -> Self {
        let mut by_student: HashMap<StudentId, &AttendanceRecord> =
            stored.iter().map(|r| (r.student_id, r)).collect();
        let mut changes = Vec::with_capacity(incoming.len());
        for record in incoming {
            match by_student.remove(&record.student_id) {
                Some(old) if old.kind == record.kind => {}
                Some(old) => changes.push(RecordChange::Update(AttendanceRecord {
                    kind: record.kind,
                    ..old.clone()
                })),
                None => changes.push(RecordChange::Insert(record)),
            }
        }
        let mut removed: Vec<AttendanceRecordId> = by_student.into_values().map(|r| r.id).collect();
        removed.sort_by_key(|id| id.as_uuid());
        Self { changes, removed }
    }

    /// Updated records that are no longer absences. A justification
    /// attached to them has nothing left to explain.
    pub fn unjustifiable(&self) -> impl Iterator<Item = AttendanceRecordId> + '_ {
        self.changes.iter().filter_map(|change| match change {
            RecordChange::Update(record) if !record.kind.is_absence() => Some(record.id),
            _ => None,
        })
    }

    /// Records that are new or changed, in register order.
    #[must_use]
    pub fn into_changed(self) -> Vec<AttendanceRecord> {
        self.changes
            .into_iter()
            .map(|change| match change {
                RecordChange::Insert(record) | RecordChange::Update(record) => record,
            })
            .collect()
    }
}

/// The reason given for an absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Justification {
    pub id: JustificationId,
    pub record_id: AttendanceRecordId,
    pub reason: String,
    pub submitted_on: Date,
}

impl Justification {
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] when `record` is not an absence
    /// or the reason is blank or too long.
    pub fn new(
        record: &AttendanceRecord,
        reason: &str,
        submitted_on: Date,
    ) -> Result<Self, CasebookError> {
        let reason = reason.trim();
        let mut checks = Checks::new();
        checks.ensure(
            record.kind.is_absence(),
            ValidationError::Rule("only absences can be justified"),
        );
        check_reason(&mut checks, reason);
        checks.finish()?;
        Ok(Self {
            id: JustificationId::new(),
            record_id: record.id,
            reason: reason.to_string(),
            submitted_on,
        })
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] when the reason is blank or too long.
    pub fn edit(&mut self, reason: &str) -> Result<(), CasebookError> {
        let reason = reason.trim();
        let mut checks = Checks::new();
        check_reason(&mut checks, reason);
        checks.finish()?;
        self.reason = reason.to_string();
        Ok(())
    }
}

fn check_reason(checks: &mut Checks, reason: &str) {
    if checks.required("reason", reason) {
        checks.length("reason", reason, 1, REASON_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> Date {
        Date::from_ymd_opt(2024, 10, d).unwrap()
    }

    fn register(entries: Vec<RegisterEntry>) -> DailyRegister {
        DailyRegister {
            class_id: ClassId::new(),
            date: day(7),
            entries,
        }
    }

    fn entry(student_id: StudentId, status: RegisterStatus) -> RegisterEntry {
        RegisterEntry { student_id, status }
    }

    #[test]
    fn should_turn_non_present_entries_into_records() {
        let (a, b, c) = (StudentId::new(), StudentId::new(), StudentId::new());
        let register = register(vec![
            entry(a, RegisterStatus::Present),
            entry(b, RegisterStatus::Absent),
            entry(c, RegisterStatus::Late { minutes: 10 }),
        ]);
        register.validate(day(7)).unwrap();

        let records = register.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].student_id, b);
        assert_eq!(records[0].kind, AttendanceKind::Absence);
        assert_eq!(records[1].kind, AttendanceKind::Delay { minutes: 10 });
    }

    #[test]
    fn should_reject_register_when_date_is_in_the_future() {
        let register = register(vec![]);
        assert_eq!(
            register.validate(day(6)),
            Err(ValidationError::Rule("register date cannot be in the future"))
        );
    }

    #[test]
    fn should_reject_register_when_student_is_listed_twice() {
        let a = StudentId::new();
        let register = register(vec![
            entry(a, RegisterStatus::Present),
            entry(a, RegisterStatus::Absent),
        ]);
        assert!(register.validate(day(7)).is_err());
    }

    #[test]
    fn should_reject_zero_minute_delay() {
        let register = register(vec![entry(
            StudentId::new(),
            RegisterStatus::Late { minutes: 0 },
        )]);
        assert!(matches!(
            register.validate(day(7)),
            Err(ValidationError::Range { field: "minutes", .. })
        ));
    }

    #[test]
    fn should_rebuild_register_from_records() {
        let (a, b) = (StudentId::new(), StudentId::new());
        let original = register(vec![
            entry(a, RegisterStatus::Present),
            entry(b, RegisterStatus::Late { minutes: 5 }),
        ]);
        let rebuilt = DailyRegister::from_records(
            original.class_id,
            original.date,
            &[a, b],
            &original.records(),
        );
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn should_deserialize_flattened_register_entry() {
        let json = format!(
            r#"{{"student_id":"{}","status":"late","minutes":15}}"#,
            uuid::Uuid::new_v4()
        );
        let entry: RegisterEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry.status, RegisterStatus::Late { minutes: 15 });
    }

    #[test]
    fn should_only_justify_absences() {
        let register = register(vec![entry(
            StudentId::new(),
            RegisterStatus::Late { minutes: 5 },
        )]);
        let record = &register.records()[0];
        assert!(Justification::new(record, "bus strike", day(8)).is_err());
    }

    #[test]
    fn should_justify_absence_with_trimmed_reason() {
        let register = register(vec![entry(StudentId::new(), RegisterStatus::Absent)]);
        let record = &register.records()[0];
        let mut justification = Justification::new(record, "  flu ", day(8)).unwrap();
        assert_eq!(justification.reason, "flu");
        assert!(justification.edit("   ").is_err());
        justification.edit("medical visit").unwrap();
        assert_eq!(justification.reason, "medical visit");
    }

    #[test]
    fn should_keep_unchanged_records_when_register_is_saved_again() {
        let (a, b, c) = (StudentId::new(), StudentId::new(), StudentId::new());
        let first = register(vec![
            entry(a, RegisterStatus::Absent),
            entry(b, RegisterStatus::Present),
            entry(c, RegisterStatus::Late { minutes: 5 }),
        ]);
        let stored = first.records();
        let second = DailyRegister {
            entries: vec![
                entry(a, RegisterStatus::Absent),
                entry(b, RegisterStatus::Late { minutes: 10 }),
                entry(c, RegisterStatus::Present),
            ],
            ..first
        };

        let diff = RegisterDiff::between(&stored, second.records());
        assert_eq!(diff.changes.len(), 1);
        assert!(matches!(&diff.changes[0], RecordChange::Insert(r) if r.student_id == b));
        assert_eq!(diff.removed, vec![stored[1].id]);
    }

    #[test]
    fn should_update_in_place_when_absence_becomes_delay() {
        let a = StudentId::new();
        let first = register(vec![entry(a, RegisterStatus::Absent)]);
        let stored = first.records();
        let second = DailyRegister {
            entries: vec![entry(a, RegisterStatus::Late { minutes: 20 })],
            ..first
        };

        let diff = RegisterDiff::between(&stored, second.records());
        assert_eq!(diff.unjustifiable().collect::<Vec<_>>(), vec![stored[0].id]);
        let changed = diff.into_changed();
        assert_eq!(changed[0].id, stored[0].id);
        assert_eq!(changed[0].kind, AttendanceKind::Delay { minutes: 20 });
    }
}
