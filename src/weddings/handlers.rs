use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::access;
use super::dto::{
    CreateWeddingRequest, PasswordVerification, PinVerification, UpdateWeddingRequest,
    VerificationResponse,
};
use super::services;
use crate::db::Wedding;
use crate::error::AppError;
use crate::state::AppState;

pub fn wedding_routes() -> Router<AppState> {
    Router::new()
        .route("/weddings", post(create_wedding).get(list_weddings))
        .route(
            "/weddings/:id",
            get(get_wedding).put(update_wedding).delete(delete_wedding),
        )
        .route("/weddings/verify-password", post(verify_password))
        .route("/weddings/verify-pin", post(verify_pin))
}

#[instrument(skip(state, payload))]
pub async fn create_wedding(
    State(state): State<AppState>,
    Json(payload): Json<CreateWeddingRequest>,
) -> Result<(StatusCode, Json<Wedding>), AppError> {
    let wedding = services::create_wedding(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(wedding)))
}

#[instrument(skip(state))]
pub async fn list_weddings(State(state): State<AppState>) -> Result<Json<Vec<Wedding>>, AppError> {
    Ok(Json(services::list_weddings(&state).await?))
}

#[instrument(skip(state))]
pub async fn get_wedding(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Wedding>, AppError> {
    Ok(Json(services::get_wedding(&state, &id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_wedding(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateWeddingRequest>,
) -> Result<Json<Wedding>, AppError> {
    Ok(Json(services::update_wedding(&state, &id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_wedding(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    services::delete_wedding(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload), fields(wedding_id = %payload.wedding_id))]
pub async fn verify_password(
    State(state): State<AppState>,
    Json(payload): Json<PasswordVerification>,
) -> Result<Json<VerificationResponse>, AppError> {
    let valid = access::verify_password(&state, &payload.wedding_id, &payload.password).await?;
    Ok(Json(VerificationResponse { valid }))
}

#[instrument(skip(state, payload), fields(wedding_id = %payload.wedding_id))]
pub async fn verify_pin(
    State(state): State<AppState>,
    Json(payload): Json<PinVerification>,
) -> Result<Json<VerificationResponse>, AppError> {
    let valid = access::verify_pin(&state, &payload.wedding_id, payload.pin.as_deref()).await?;
    Ok(Json(VerificationResponse { valid }))
}
