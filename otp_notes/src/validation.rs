//! Field-level checks shared by every request schema

use serde::Serialize;

/// One rejected request field
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collects field errors for a single request
#[derive(Debug, Default)]
pub(crate) struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub(crate) fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !is_valid_email(value) {
            self.reject(field, "Invalid email");
        }
        self
    }

    pub(crate) fn exact_len(&mut self, field: &str, value: &str, len: usize) -> &mut Self {
        if value.chars().count() != len {
            self.reject(
                field,
                format!("String must contain exactly {len} character(s)"),
            );
        }
        self
    }

    pub(crate) fn min_len(&mut self, field: &str, value: &str, len: usize) -> &mut Self {
        if value.chars().count() < len {
            self.reject(
                field,
                format!("String must contain at least {len} character(s)"),
            );
        }
        self
    }

    pub(crate) fn non_empty(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if value.is_empty() {
            self.reject(field, message);
        }
        self
    }

    /// Absent is fine, present must be non-empty
    pub(crate) fn optional_non_empty(
        &mut self,
        field: &str,
        value: Option<&str>,
        message: &str,
    ) -> &mut Self {
        if let Some(value) = value {
            self.non_empty(field, value, message);
        }
        self
    }

    pub(crate) fn finish(&mut self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

/// Structural email check: one `@`, non-empty local part, dotted domain, no whitespace
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') || local.starts_with('.') || local.ends_with('.')
    {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
        && labels
            .last()
            .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}
