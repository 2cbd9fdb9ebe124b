//! Student: a pupil enrolled in a class.

use serde::{Deserialize, Serialize};

use crate::error::CasebookError;
use crate::id::{ClassId, StudentId};
use crate::validation::Checks;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub class_id: ClassId,
    pub full_name: String,
    pub email: String,
    /// Address notified about absences and delays.
    pub parent_email: String,
}

/// Enrollment data for a new student.
#[derive(Debug, Clone, Deserialize)]
pub struct Enrollment {
    pub full_name: String,
    pub email: String,
    pub parent_email: String,
}

impl Student {
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] listing every failed rule.
    pub fn enroll(class_id: ClassId, enrollment: &Enrollment) -> Result<Self, CasebookError> {
        let mut checks = Checks::new();
        checks
            .full_name(&enrollment.full_name)
            .email("email", &enrollment.email)
            .email("parent_email", &enrollment.parent_email);
        checks.finish()?;

        Ok(Self {
            id: StudentId::new(),
            class_id,
            full_name: enrollment.full_name.trim().to_string(),
            email: enrollment.email.trim().to_lowercase(),
            parent_email: enrollment.parent_email.trim().to_lowercase(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn should_enroll_student_when_valid() {
        let student = Student::enroll(
            ClassId::new(),
            &Enrollment {
                full_name: "Luca Verdi".to_string(),
                email: "luca@school.example.org".to_string(),
                parent_email: "Parent.Verdi@mail.example.org".to_string(),
            },
        )
        .unwrap();
        assert_eq!(student.parent_email, "parent.verdi@mail.example.org");
    }

    #[test]
    fn should_reject_invalid_parent_email() {
        let result = Student::enroll(
            ClassId::new(),
            &Enrollment {
                full_name: "Luca Verdi".to_string(),
                email: "luca@school.example.org".to_string(),
                parent_email: "not-an-email".to_string(),
            },
        );
        assert!(matches!(
            result,
            Err(CasebookError::Validation(ValidationError::Format {
                field: "parent_email"
            }))
        ));
    }
}
