use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::error::ApiError;

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Field name → localized message, sorted for stable JSON output.
#[derive(Debug, Default, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        // First error per field wins, matching required-before-format checks.
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

/// Accumulates per-field validation errors for one form submission.
/// Each rule trims its input and returns the trimmed value so handlers
/// work with sanitized strings.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(&mut self, field: &str, value: &str, message: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.errors.insert(field, message);
        }
        value.to_string()
    }

    pub fn email(&mut self, field: &str, value: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.errors.insert(field, "L'adresse email est requise.");
        } else if !is_valid_email(value) {
            self.errors.insert(field, "L'adresse email n'est pas valide.");
        }
        value.to_string()
    }

    /// Length rule in characters, not bytes. Empty values are left to
    /// `required`; this only fires on non-empty input.
    pub fn min_len(&mut self, field: &str, value: &str, min: usize, message: &str) -> String {
        let value = value.trim();
        if !value.is_empty() && value.chars().count() < min {
            self.errors.insert(field, message);
        }
        value.to_string()
    }

    pub fn insert_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field, message);
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self.errors))
        }
    }
}
