//! Card error types
//!
//! Validation failures carry a [`FieldErrors`] map so callers can redisplay
//! the submitted form with a message next to each offending field.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Field name to error messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&rendered)
    }
}

/// Card operation errors
#[derive(Error, Debug)]
pub enum CardError {
    /// One or more fields were rejected; nothing was written
    #[error("Card validation failed: {0}")]
    Validation(FieldErrors),

    /// Card not found by ID
    #[error("Card {0} not found")]
    NotFound(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl CardError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, CardError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CardError::NotFound(_))
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            CardError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            CardError::Validation(_) => "VALIDATION_FAILED",
            CardError::NotFound(_) => "NOT_FOUND",
            CardError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<FieldErrors> for CardError {
    fn from(errors: FieldErrors) -> Self {
        CardError::Validation(errors)
    }
}
