//! Form validation toolkit.
//!
//! A [`Checks`] accumulates every failed rule of a form so the caller can
//! report them all at once instead of stopping at the first problem.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// Letters, digits and underscore, 3 to 20 characters.
pub static USERNAME: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[A-Za-z0-9_]{3,20}$"));

pub static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$"));

/// Alphanumeric words separated by spaces.
pub static TAG_NAME: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[A-Za-z0-9 ]+$"));

pub static CLASS_NAME: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[A-Za-z0-9 ]{1,20}$"));

/// Characters accepted as the mandatory special character of a password.
pub const PASSWORD_SPECIALS: &str = "@#$%^&+=";

/// Minimum password length, in characters.
pub const PASSWORD_MIN_LENGTH: usize = 8;

fn pattern(source: &str) -> Regex {
    // Sources are literals checked by the tests below.
    Regex::new(source).expect("static pattern compiles")
}

/// Accumulator of failed validation rules.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<ValidationError>,
}

impl Checks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure when `value` is blank. Returns whether it was present.
    pub fn required(&mut self, field: &'static str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.errors.push(ValidationError::Required { field });
            return false;
        }
        true
    }

    /// Record a failure when the character count is outside `min..=max`.
    pub fn length(&mut self, field: &'static str, value: &str, min: usize, max: usize) -> &mut Self {
        let count = value.chars().count();
        if count < min || count > max {
            self.errors.push(ValidationError::Length { field, min, max });
        }
        self
    }

    /// Record a failure when `value` does not match `regex`.
    pub fn matches(&mut self, field: &'static str, value: &str, regex: &Regex) -> &mut Self {
        if !regex.is_match(value) {
            self.errors.push(ValidationError::Format { field });
        }
        self
    }

    /// Record a failure when `value` is outside `min..=max`.
    pub fn range(&mut self, field: &'static str, value: i64, min: i64, max: i64) -> &mut Self {
        if value < min || value > max {
            self.errors.push(ValidationError::Range { field, min, max });
        }
        self
    }

    /// Record a failure when `password` breaks the password policy.
    pub fn password(&mut self, value: &str) -> &mut Self {
        if !is_strong_password(value) {
            self.errors.push(ValidationError::WeakPassword);
        }
        self
    }

    /// Record a failure when `value` is blank or not an email address.
    pub fn email(&mut self, field: &'static str, value: &str) -> &mut Self {
        if self.required(field, value) {
            self.matches(field, value.trim(), &EMAIL);
        }
        self
    }

    /// Record a failure when a person's name is blank or outside 2..=100 characters.
    pub fn full_name(&mut self, value: &str) -> &mut Self {
        if self.required("full_name", value) {
            self.length("full_name", value.trim(), 2, 100);
        }
        self
    }

    /// Check a new password and its confirmation.
    pub fn new_password(&mut self, password: &str, confirmation: &str) -> &mut Self {
        if self.required("password", password) {
            self.password(password);
        }
        if self.required("confirm_password", confirmation) {
            self.ensure(password == confirmation, ValidationError::PasswordMismatch);
        }
        self
    }

    /// Record an arbitrary failure.
    pub fn push(&mut self, error: ValidationError) -> &mut Self {
        self.errors.push(error);
        self
    }

    /// Record `error` when `condition` is false.
    pub fn ensure(&mut self, condition: bool, error: ValidationError) -> &mut Self {
        if !condition {
            self.errors.push(error);
        }
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Turn the accumulated failures into a result.
    ///
    /// # Errors
    ///
    /// Returns the only failure as-is, or [`ValidationError::Many`] when
    /// several rules failed.
    pub fn finish(mut self) -> Result<(), ValidationError> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(ValidationError::Many(self.errors)),
        }
    }
}

/// At least 8 characters, no whitespace, and at least one digit, one
/// lowercase letter, one uppercase letter and one of [`PASSWORD_SPECIALS`].
#[must_use]
pub fn is_strong_password(value: &str) -> bool {
    value.chars().count() >= PASSWORD_MIN_LENGTH
        && !value.chars().any(char::is_whitespace)
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(char::is_lowercase)
        && value.chars().any(char::is_uppercase)
        && value.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}
