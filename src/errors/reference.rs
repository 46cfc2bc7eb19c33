use thiserror::Error;

use super::FieldErrors;

/// Color and edition maintenance errors
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Invalid reference data: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl ReferenceError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, ReferenceError::Validation(_))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ReferenceError::Validation(_) => "VALIDATION_FAILED",
            ReferenceError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<FieldErrors> for ReferenceError {
    fn from(errors: FieldErrors) -> Self {
        ReferenceError::Validation(errors)
    }
}
