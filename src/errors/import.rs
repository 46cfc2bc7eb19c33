//! Import error types
//!
//! Only run-level failures live here. A record that fails to persist is not
//! an error: it shows up as a skipped outcome in the import report.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    /// The record's set reference matches no edition
    #[error("Record {index} ({id}) references unknown edition '{reference}'")]
    UnknownEdition {
        index: usize,
        id: String,
        reference: String,
    },

    /// One of the record's color references matches no color
    #[error("Record {index} ({id}) references unknown color '{reference}'")]
    UnknownColor {
        index: usize,
        id: String,
        reference: String,
    },

    /// The input is not a JSON array of card records
    #[error("Invalid import data: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Loading reference data failed before any record was processed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl ImportError {
    /// Reference data must be fully seeded before an import; a miss means it wasn't.
    pub fn is_reference_miss(&self) -> bool {
        matches!(
            self,
            ImportError::UnknownEdition { .. } | ImportError::UnknownColor { .. }
        )
    }

    pub fn is_client_error(&self) -> bool {
        self.is_reference_miss() || matches!(self, ImportError::InvalidJson(_))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ImportError::UnknownEdition { .. } | ImportError::UnknownColor { .. } => {
                "UNKNOWN_REFERENCE"
            }
            ImportError::InvalidJson(_) => "JSON_ERROR",
            ImportError::Io(_) => "IO_ERROR",
            ImportError::Database(_) => "DATABASE_ERROR",
        }
    }
}
