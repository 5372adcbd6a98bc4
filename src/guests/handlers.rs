use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::CreateGuestRequest;
use super::services;
use crate::db::Guest;
use crate::error::AppError;
use crate::state::AppState;

pub fn guest_routes() -> Router<AppState> {
    Router::new()
        .route("/guests", post(create_guest))
        .route("/guests/:id", delete(delete_guest))
        .route("/weddings/:id/guests", get(list_wedding_guests))
}

#[instrument(skip(state, payload), fields(wedding_id = %payload.wedding_id))]
pub async fn create_guest(
    State(state): State<AppState>,
    Json(payload): Json<CreateGuestRequest>,
) -> Result<(StatusCode, Json<Guest>), AppError> {
    let guest = services::create_guest(&state, &payload.name, &payload.wedding_id).await?;
    Ok((StatusCode::CREATED, Json(guest)))
}

#[instrument(skip(state))]
pub async fn list_wedding_guests(
    State(state): State<AppState>,
    Path(wedding_id): Path<String>,
) -> Result<Json<Vec<Guest>>, AppError> {
    Ok(Json(services::list_guests_for_wedding(&state, &wedding_id).await?))
}

#[instrument(skip(state))]
pub async fn delete_guest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    services::delete_guest(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
