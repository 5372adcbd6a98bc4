use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::CreateMessageRequest;
use super::services::{self, Upload};
use crate::db::{MediaKind, MediaMemory, MessageMemory, WeddingMemories};
use crate::error::AppError;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/weddings/:id/memories", get(get_wedding_memories))
}

pub fn write_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/memories/photos", post(create_photo))
        .route("/memories/videos", post(create_video))
        .route("/memories/audios", post(create_audio))
        .route("/memories/messages", post(create_message))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Fields of a memory upload form: `file`, `guest_id`, `wedding_id` and,
/// for audio, an optional `duration`.
#[derive(Default)]
struct MediaForm {
    upload: Option<Upload>,
    guest_id: Option<String>,
    wedding_id: Option<String>,
    duration: Option<String>,
}

fn bad_form(e: MultipartError) -> AppError {
    AppError::validation(format!("Invalid form data: {}", e.body_text()))
}

async fn read_form(mut mp: Multipart) -> Result<MediaForm, AppError> {
    let mut form = MediaForm::default();
    while let Some(field) = mp.next_field().await.map_err(bad_form)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let body = field.bytes().await.map_err(bad_form)?;
                form.upload = Some(Upload {
                    file_name,
                    content_type,
                    body,
                });
            }
            Some("guest_id") => form.guest_id = Some(field.text().await.map_err(bad_form)?),
            Some("wedding_id") => form.wedding_id = Some(field.text().await.map_err(bad_form)?),
            Some("duration") => form.duration = Some(field.text().await.map_err(bad_form)?),
            _ => {}
        }
    }
    Ok(form)
}

async fn create_media(
    state: AppState,
    kind: MediaKind,
    mp: Multipart,
) -> Result<(StatusCode, Json<MediaMemory>), AppError> {
    let form = read_form(mp).await?;
    let upload = form
        .upload
        .ok_or_else(|| AppError::validation("file is required"))?;
    let guest_id = form
        .guest_id
        .ok_or_else(|| AppError::validation("guest_id is required"))?;
    let wedding_id = form
        .wedding_id
        .ok_or_else(|| AppError::validation("wedding_id is required"))?;

    let memory =
        services::create_media(&state, kind, upload, &guest_id, &wedding_id, form.duration)
            .await?;
    Ok((StatusCode::CREATED, Json(memory)))
}

#[instrument(skip(state, mp))]
pub async fn create_photo(
    State(state): State<AppState>,
    mp: Multipart,
) -> Result<(StatusCode, Json<MediaMemory>), AppError> {
    create_media(state, MediaKind::Photo, mp).await
}

#[instrument(skip(state, mp))]
pub async fn create_video(
    State(state): State<AppState>,
    mp: Multipart,
) -> Result<(StatusCode, Json<MediaMemory>), AppError> {
    create_media(state, MediaKind::Video, mp).await
}

#[instrument(skip(state, mp))]
pub async fn create_audio(
    State(state): State<AppState>,
    mp: Multipart,
) -> Result<(StatusCode, Json<MediaMemory>), AppError> {
    create_media(state, MediaKind::Audio, mp).await
}

#[instrument(skip(state, payload), fields(wedding_id = %payload.wedding_id))]
pub async fn create_message(
    State(state): State<AppState>,
    Json(payload): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageMemory>), AppError> {
    let message = services::create_message(
        &state,
        payload.content,
        &payload.guest_id,
        &payload.wedding_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[instrument(skip(state))]
pub async fn get_wedding_memories(
    State(state): State<AppState>,
    Path(wedding_id): Path<String>,
) -> Result<Json<WeddingMemories>, AppError> {
    Ok(Json(services::wedding_memories(&state, &wedding_id).await?))
}
