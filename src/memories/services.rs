use bytes::Bytes;
use tracing::{error, info, instrument, warn};

use crate::db::{MediaKind, MediaMemory, MessageMemory, NewMedia, NewMessage, WeddingMemories};
use crate::error::{AppError, AppResult};
use crate::ids::new_id;
use crate::state::AppState;
use crate::storage;

/// One uploaded file as received from the client.
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub body: Bytes,
}

async fn ensure_parents(st: &AppState, guest_id: &str, wedding_id: &str) -> AppResult<()> {
    if st.repo.find_guest(guest_id).await?.is_none() {
        warn!(%guest_id, "guest not found");
        return Err(AppError::not_found("Guest not found"));
    }
    if st.repo.find_wedding(wedding_id).await?.is_none() {
        warn!(%wedding_id, "wedding not found");
        return Err(AppError::not_found("Wedding not found"));
    }
    Ok(())
}

/// Store a photo, video or audio clip and record it.
///
/// Order matters: content type, then guest, then wedding, then the blob.
/// If the record cannot be written the blob is removed again (best-effort).
#[instrument(skip(st, upload, duration), fields(file = %upload.file_name))]
pub async fn create_media(
    st: &AppState,
    kind: MediaKind,
    upload: Upload,
    guest_id: &str,
    wedding_id: &str,
    duration: Option<String>,
) -> AppResult<MediaMemory> {
    kind.check_content_type(&upload.content_type)?;
    ensure_parents(st, guest_id, wedding_id).await?;

    let size = upload.body.len();
    let reference = st
        .storage
        .store(
            kind.blob_category(),
            &upload.file_name,
            upload.body,
            &upload.content_type,
        )
        .await
        .map_err(|e| {
            error!(error = %e, "blob store failed");
            AppError::Internal(e)
        })?;

    let new = NewMedia {
        id: new_id(),
        kind,
        url: reference.clone(),
        duration: match kind {
            MediaKind::Audio => duration,
            MediaKind::Photo | MediaKind::Video => None,
        },
        guest_id: guest_id.to_string(),
        wedding_id: wedding_id.to_string(),
    };

    match st.repo.insert_media(new).await {
        Ok(memory) => {
            info!(memory_id = %memory.id, size, "memory stored");
            Ok(memory)
        }
        Err(e) => {
            error!(error = %e, %reference, "insert failed, discarding blob");
            storage::discard(st.storage.as_ref(), std::slice::from_ref(&reference)).await;
            Err(AppError::Internal(e))
        }
    }
}

#[instrument(skip(st, content))]
pub async fn create_message(
    st: &AppState,
    content: String,
    guest_id: &str,
    wedding_id: &str,
) -> AppResult<MessageMemory> {
    if content.chars().count() > st.config.message_max_chars {
        return Err(AppError::validation(format!(
            "Message is too long (max {} characters)",
            st.config.message_max_chars
        )));
    }
    ensure_parents(st, guest_id, wedding_id).await?;

    let message = st
        .repo
        .insert_message(NewMessage {
            id: new_id(),
            content,
            guest_id: guest_id.to_string(),
            wedding_id: wedding_id.to_string(),
        })
        .await?;
    info!(memory_id = %message.id, "message stored");
    Ok(message)
}

/// Everything guests left for a wedding, grouped by kind.
///
/// An unknown wedding simply has no memories; this is not a NotFound.
pub async fn wedding_memories(st: &AppState, wedding_id: &str) -> AppResult<WeddingMemories> {
    let (photos, videos, audios, messages) = tokio::try_join!(
        st.repo.list_media(MediaKind::Photo, wedding_id),
        st.repo.list_media(MediaKind::Video, wedding_id),
        st.repo.list_media(MediaKind::Audio, wedding_id),
        st.repo.list_messages(wedding_id),
    )?;
    Ok(WeddingMemories {
        photos,
        videos,
        audios,
        messages,
    })
}
