//! User: a SMOS account with one or more roles.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::credential::PasswordDigest;
use crate::error::{CasebookError, ValidationError};
use crate::id::UserId;
use crate::validation::{Checks, USERNAME};

/// What a SMOS user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Administrator,
    Teacher,
    Student,
    Parent,
    /// Administrative, technical and auxiliary staff.
    Ata,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Parent => "parent",
            Self::Ata => "ata",
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" => Ok(Self::Administrator),
            "teacher" => Ok(Self::Teacher),
            "student" => Ok(Self::Student),
            "parent" => Ok(Self::Parent),
            "ata" => Ok(Self::Ata),
            _ => Err(ValidationError::Format { field: "role" }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: PasswordDigest,
    pub roles: BTreeSet<Role>,
}

impl User {
    /// Validate `form` and create the account it describes.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] listing every failed rule.
    pub fn create(form: &NewUserForm) -> Result<Self, CasebookError> {
        form.validate()?;
        Ok(Self {
            id: UserId::new(),
            login: form.login.trim().to_string(),
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_lowercase(),
            password: PasswordDigest::derive(&form.password),
            roles: form.roles.clone(),
        })
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Data entered by an administrator to create a user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUserForm {
    pub login: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
}

impl NewUserForm {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewUserForm {
        NewUserForm {
            login: "prof_bianchi".to_string(),
            full_name: "Anna Bianchi".to_string(),
            email: "anna.bianchi@smos.example.org".to_string(),
            password: "Teach#2024".to_string(),
            confirm_password: "Teach#2024".to_string(),
            roles: BTreeSet::from([Role::Teacher]),
        }
    }

    #[test]
    fn should_create_user_with_roles() {
        let user = User::create(&form()).unwrap();
        assert!(user.has_role(Role::Teacher));
        assert!(!user.has_role(Role::Administrator));
    }

    #[test]
    fn should_reject_invalid_login() {
        let mut form = form();
        form.login = "a b".to_string();
        assert_eq!(
            form.validate(),
            Err(ValidationError::Format { field: "login" })
        );
    }

    #[test]
    fn should_parse_roles_from_snake_case() {
        assert_eq!("ata".parse::<Role>().unwrap(), Role::Ata);
        assert!("janitor".parse::<Role>().is_err());
        assert_eq!(
            serde_json::to_string(&Role::Administrator).unwrap(),
            "\"administrator\""
        );
    }
}
