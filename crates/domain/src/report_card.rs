//! Report card: a student's grades for one term of an academic year.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CasebookError, ValidationError};
use crate::id::{AcademicYearId, ReportCardId, StudentId};
use crate::time::{Timestamp, now};
use crate::validation::Checks;

pub const MAX_SCORE: u8 = 100;
pub const SUBJECT_MAX: usize = 50;
pub const COMMENT_MAX: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    First,
    Second,
}

impl Term {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
        }
    }
}

impl FromStr for Term {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::First),
            "second" => Ok(Self::Second),
            _ => Err(ValidationError::Format { field: "term" }),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectGrade {
    pub subject: String,
    /// Score out of [`MAX_SCORE`].
    pub score: u8,
}

impl SubjectGrade {
    /// Letter grade: A from 90, B from 80, C from 70, D from 60, F below.
    #[must_use]
    pub fn letter(&self) -> char {
        match self.score {
            90.. => 'A',
            80..=89 => 'B',
            70..=79 => 'C',
            60..=69 => 'D',
            _ => 'F',
        }
    }
}

/// Grades submitted by a teacher for one student.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportCardForm {
    pub academic_year_id: AcademicYearId,
    pub term: Term,
    pub grades: Vec<SubjectGrade>,
    #[serde(default)]
    pub teacher_comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportCard {
    pub id: ReportCardId,
    pub student_id: StudentId,
    pub academic_year_id: AcademicYearId,
    pub term: Term,
    pub grades: Vec<SubjectGrade>,
    pub teacher_comment: String,
    pub published_at: Timestamp,
}

impl ReportCard {
    /// Validate `form` and build the report card of `student_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] when there are no grades, a
    /// subject is blank, too long or repeated, a score exceeds
    /// [`MAX_SCORE`], or the comment is too long.
    pub fn new(student_id: StudentId, form: &ReportCardForm) -> Result<Self, CasebookError> {
        let grades: Vec<SubjectGrade> = form
            .grades
            .iter()
            .map(|grade| SubjectGrade {
                subject: grade.subject.trim().to_string(),
                score: grade.score,
            })
            .collect();
        let teacher_comment = form.teacher_comment.trim();

        let mut checks = Checks::new();
        checks.ensure(
            !grades.is_empty(),
            ValidationError::Rule("a report card needs at least one grade"),
        );
        let mut subjects = HashSet::with_capacity(grades.len());
        for grade in &grades {
            if checks.required("subject", &grade.subject) {
                checks.length("subject", &grade.subject, 1, SUBJECT_MAX);
                let normalized = grade.subject.to_lowercase();
                if !subjects.insert(normalized) {
                    checks.push(ValidationError::NotUnique {
                        field: "subject",
                        value: grade.subject.clone(),
                    });
                }
            }
            checks.range("score", grade.score.into(), 0, MAX_SCORE.into());
        }
        checks.length("teacher_comment", teacher_comment, 0, COMMENT_MAX);
        checks.finish()?;

        Ok(Self {
            id: ReportCardId::new(),
            student_id,
            academic_year_id: form.academic_year_id,
            term: form.term,
            grades,
            teacher_comment: teacher_comment.to_string(),
            published_at: now(),
        })
    }

    /// Mean score over every subject.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average(&self) -> Option<f64> {
        if self.grades.is_empty() {
            return None;
        }
        let total: u32 = self.grades.iter().map(|g| u32::from(g.score)).sum();
        Some(f64::from(total) / self.grades.len() as f64)
    }
}
