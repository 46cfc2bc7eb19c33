use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::errors::{CardError, FieldErrors, ImportError, ReferenceError};
use crate::services::ImportReport;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Card(#[from] CardError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// Import stopped part way; `report` holds the records already written
    #[error("{source}")]
    ImportStopped {
        source: ImportError,
        report: ImportReport,
    },

    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Card(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Card(err) if err.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ImportStopped { source, .. } if source.is_client_error() => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Reference(err) if err.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Body(rejection) => rejection.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Card(err) => err.error_code(),
            ApiError::ImportStopped { source, .. } => source.error_code(),
            ApiError::Body(_) => "INVALID_BODY",
            ApiError::Reference(err) => err.error_code(),
            ApiError::Database(_) => "DATABASE_ERROR",
        }
    }

    fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Card(CardError::Validation(errors))
            | ApiError::Reference(ReferenceError::Validation(errors)) => Some(errors),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = match (&self, self.field_errors()) {
            (_, Some(errors)) => json!({
                "code": self.code(),
                "message": "Validation failed",
                "errors": errors,
            }),
            (ApiError::ImportStopped { report, .. }, None) => json!({
                "code": self.code(),
                "message": self.to_string(),
                "report": report,
            }),
            (_, None) => json!({
                "code": self.code(),
                "message": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
