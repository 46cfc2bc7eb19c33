use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use tracing::info;

use super::ApiError;
use crate::server::app::AppState;
use crate::services::{ImportRecord, ImportReport};

/// Admin-triggered bulk import. A reference miss under the abort policy
/// answers 422 with the outcomes of the records imported before it, which
/// stay in place.
pub async fn import_cards(
    State(state): State<AppState>,
    payload: Result<Json<Vec<ImportRecord>>, JsonRejection>,
) -> Result<Json<ImportReport>, ApiError> {
    let Json(records) = payload?;
    info!("Import requested for {} records", records.len());

    let mut report = ImportReport::default();
    match state.import_service().import_into(&records, &mut report).await {
        Ok(()) => Ok(Json(report)),
        Err(source) => Err(ApiError::ImportStopped { source, report }),
    }
}
