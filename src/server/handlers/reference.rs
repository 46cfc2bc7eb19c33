use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};

use super::ApiError;
use crate::database::entities::{colors, editions};
use crate::server::app::AppState;
use crate::services::{NewColor, NewEdition};

pub async fn list_editions(
    State(state): State<AppState>,
) -> Result<Json<Vec<editions::Model>>, ApiError> {
    Ok(Json(state.references.list_editions().await?))
}

pub async fn create_edition(
    State(state): State<AppState>,
    payload: Result<Json<NewEdition>, JsonRejection>,
) -> Result<(StatusCode, Json<editions::Model>), ApiError> {
    let Json(payload) = payload?;
    let edition = state.references.create_edition(&payload).await?;
    Ok((StatusCode::CREATED, Json(edition)))
}

pub async fn list_colors(
    State(state): State<AppState>,
) -> Result<Json<Vec<colors::Model>>, ApiError> {
    Ok(Json(state.references.list_colors().await?))
}

pub async fn create_color(
    State(state): State<AppState>,
    payload: Result<Json<NewColor>, JsonRejection>,
) -> Result<(StatusCode, Json<colors::Model>), ApiError> {
    let Json(payload) = payload?;
    let color = state.references.create_color(&payload).await?;
    Ok((StatusCode::CREATED, Json(color)))
}
