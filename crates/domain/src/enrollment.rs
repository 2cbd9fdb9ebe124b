//! Enrollment request: a prospective student asking for a SMOS account.
//!
//! An administrator later accepts the request, which turns it into a
//! [`User`] with the student role, or rejects it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::credential::PasswordDigest;
use crate::error::{CasebookError, ValidationError};
use crate::id::{EnrollmentRequestId, UserId};
use crate::time::{Timestamp, now};
use crate::user::{Role, User};
use crate::validation::{Checks, USERNAME};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    pub id: EnrollmentRequestId,
    pub login: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: PasswordDigest,
    pub requested_at: Timestamp,
}

/// Data entered by a guest asking to be enrolled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollmentForm {
    pub login: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl EnrollmentForm {
    /// # Errors
    ///
    /// Returns the failed rules as a [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut checks = Checks::new();
        if checks.required("login", &self.login) {
            checks.matches("login", self.login.trim(), &USERNAME);
        }
        checks
            .full_name(&self.full_name)
            .email("email", &self.email)
            .new_password(&self.password, &self.confirm_password);
        checks.finish()
    }
}

impl EnrollmentRequest {
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] listing every failed rule.
    pub fn submit(form: &EnrollmentForm) -> Result<Self, CasebookError> {
        form.validate()?;
        Ok(Self {
            id: EnrollmentRequestId::new(),
            login: form.login.trim().to_string(),
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_lowercase(),
            password: PasswordDigest::derive(&form.password),
            requested_at: now(),
        })
    }

    /// The student account this request becomes once accepted. The password
    /// chosen at submission carries over.
    #[must_use]
    pub fn into_user(self) -> User {
        User {
            id: UserId::new(),
            login: self.login,
            full_name: self.full_name,
            email: self.email,
            password: self.password,
            roles: BTreeSet::from([Role::Student]),
        }
    }
}
