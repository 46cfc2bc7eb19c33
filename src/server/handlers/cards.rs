use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};

use super::ApiError;
use crate::database::entities::cards;
use crate::server::app::AppState;
use crate::services::{CardDetails, CardFilter, CardForm, FormChoices};

/// Homepage listing: a random handful of cards.
pub async fn sample_cards(
    State(state): State<AppState>,
) -> Result<Json<Vec<cards::Model>>, ApiError> {
    Ok(Json(state.cards.random_sample().await?))
}

pub async fn search_cards(
    State(state): State<AppState>,
    Query(filter): Query<CardFilter>,
) -> Result<Json<Vec<cards::Model>>, ApiError> {
    Ok(Json(state.cards.filter_cards(&filter).await?))
}

pub async fn create_card(
    State(state): State<AppState>,
    payload: Result<Json<CardForm>, JsonRejection>,
) -> Result<(StatusCode, Json<CardDetails>), ApiError> {
    let Json(form) = payload?;
    let card = state.cards.create_card(&form).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn form_choices(State(state): State<AppState>) -> Result<Json<FormChoices>, ApiError> {
    Ok(Json(state.cards.form_choices().await?))
}

pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CardDetails>, ApiError> {
    Ok(Json(state.cards.get_card(&id).await?))
}
