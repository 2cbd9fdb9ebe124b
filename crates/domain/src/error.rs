//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`CasebookError`] via `#[from]`. Every named negative outcome of a use
//! case (feedback already released, banner limit reached, …) is a variant
//! of [`ConflictError`] or [`AuthError`] rather than a free-form string.

use std::fmt;

/// Root error type for every use case.
#[derive(Debug, thiserror::Error)]
pub enum CasebookError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The backing store could not complete the operation.
    #[error("storage error")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// A single failed rule, or all the failed rules of a form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("{field} has an invalid format")]
    Format { field: &'static str },

    #[error("{field} must be between {min} and {max}")]
    Range {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error(
        "password must be at least 8 characters with an uppercase letter, a lowercase letter, a digit and one of @#$%^&+="
    )]
    WeakPassword,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("unsupported image format, expected jpg, jpeg, png, gif or webp")]
    UnsupportedImageFormat,

    #[error("{field} is not unique: {value}")]
    NotUnique { field: &'static str, value: String },

    #[error("{0}")]
    Rule(&'static str),

    #[error("{}", Joined(.0))]
    Many(Vec<ValidationError>),
}

impl ValidationError {
    /// Flatten into the list of individual failures.
    #[must_use]
    pub fn failures(&self) -> Vec<&ValidationError> {
        match self {
            Self::Many(all) => all.iter().flat_map(ValidationError::failures).collect(),
            other => vec![other],
        }
    }
}

struct Joined<'a>(&'a [ValidationError]);

impl fmt::Display for Joined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, err) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            err.fmt(f)?;
        }
        Ok(())
    }
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The operation would break a uniqueness or capacity rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("username {0} is already taken")]
    UsernameTaken(String),

    #[error("email {0} is already registered")]
    EmailTaken(String),

    #[error("login {0} is already taken")]
    LoginTaken(String),

    #[error("tourist {tourist} already released feedback for site {site}")]
    FeedbackAlreadyReleased { tourist: String, site: String },

    #[error("refreshment point {point} already holds the maximum of {max} banners")]
    BannerLimitReached { point: String, max: u32 },

    #[error("tag {0} already exists")]
    TagAlreadyExists(String),

    #[error("academic year starting in {0} already exists")]
    AcademicYearExists(i32),

    #[error("class {0} already exists in this academic year")]
    ClassExists(String),

    #[error("attendance record {0} is already justified")]
    AlreadyJustified(String),

    #[error("teaching {0} already exists")]
    TeachingExists(String),

    #[error("address {0} already exists")]
    AddressExists(String),

    #[error("refreshment point {0} already has a convention waiting for activation")]
    ConventionPending(String),

    #[error("convention {0} is not waiting for activation")]
    ConventionNotPending(String),

    #[error("refreshment point {0} already has an active convention in that period")]
    ConventionOverlap(String),

    #[error("duplicate record: {0}")]
    Duplicate(String),
}

/// Authentication and ownership failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("only the author may {action}")]
    NotOwner { action: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_join_messages_when_many_failures() {
        let err = ValidationError::Many(vec![
            ValidationError::Required { field: "username" },
            ValidationError::PasswordMismatch,
        ]);
        assert_eq!(
            err.to_string(),
            "username is required; passwords do not match"
        );
    }

    #[test]
    fn should_flatten_nested_failures() {
        let err = ValidationError::Many(vec![
            ValidationError::Required { field: "a" },
            ValidationError::Many(vec![ValidationError::Required { field: "b" }]),
        ]);
        assert_eq!(err.failures().len(), 2);
    }

    #[test]
    fn should_render_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Site",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "Site 42 not found");
    }

    #[test]
    fn should_convert_conflict_into_root_error() {
        let err: CasebookError = ConflictError::TagAlreadyExists("museum".to_string()).into();
        assert!(matches!(
            err,
            CasebookError::Conflict(ConflictError::TagAlreadyExists(_))
        ));
    }
}
