use sqlx::FromRow;
use time::OffsetDateTime;

use super::models::{Guest, MediaMemory, MessageMemory};

/// Memory row joined with its guest (`g.*` columns prefixed `guest_`).
#[derive(Debug, FromRow)]
pub struct MediaRow {
    pub id: String,
    pub url: String,
    pub duration: Option<String>,
    pub guest_id: String,
    pub wedding_id: String,
    pub created_at: OffsetDateTime,
    pub guest_name: String,
    pub guest_wedding_id: String,
    pub guest_created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct MessageRow {
    pub id: String,
    pub content: String,
    pub guest_id: String,
    pub wedding_id: String,
    pub created_at: OffsetDateTime,
    pub guest_name: String,
    pub guest_wedding_id: String,
    pub guest_created_at: OffsetDateTime,
}

impl From<MediaRow> for MediaMemory {
    fn from(r: MediaRow) -> Self {
        Self {
            guest: Guest {
                id: r.guest_id.clone(),
                name: r.guest_name,
                wedding_id: r.guest_wedding_id,
                created_at: r.guest_created_at,
            },
            id: r.id,
            url: r.url,
            duration: r.duration,
            guest_id: r.guest_id,
            wedding_id: r.wedding_id,
            created_at: r.created_at,
        }
    }
}

impl From<MessageRow> for MessageMemory {
    fn from(r: MessageRow) -> Self {
        Self {
            guest: Guest {
                id: r.guest_id.clone(),
                name: r.guest_name,
                wedding_id: r.guest_wedding_id,
                created_at: r.guest_created_at,
            },
            id: r.id,
            content: r.content,
            guest_id: r.guest_id,
            wedding_id: r.wedding_id,
            created_at: r.created_at,
        }
    }
}
