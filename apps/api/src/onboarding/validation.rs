use chrono::NaiveDate;

use crate::errors::{AppError, FieldError};

/// Collects field-level failures so a request reports all of them at once.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, reason: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            reason: reason.into(),
        });
    }

    /// Rejects blank (empty or whitespace-only) text.
    pub fn require_text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        }
    }

    pub fn require_some<T>(&mut self, field: &str, value: &Option<T>) {
        if value.is_none() {
            self.push(field, "is required");
        }
    }

    /// Open-ended ranges (no end date) are always valid.
    pub fn check_date_range(&mut self, field: &str, start: NaiveDate, end: Option<NaiveDate>) {
        if let Some(end) = end {
            if end < start {
                self.push(field, "must not be before the start date");
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }

    pub fn into_error(self) -> AppError {
        AppError::InvalidFields(self.errors)
    }
}

/// Trims and maps blank optional text to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
