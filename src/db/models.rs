use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Wedding record. The password never leaves the service.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Wedding {
    pub id: String,
    pub groom_name: String,
    pub bride_name: String,
    pub date: String,
    pub location: String,
    pub banner_image: String,
    pub description: Option<String>,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub pin: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Guest {
    pub id: String,
    pub name: String,
    pub wedding_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The three memory kinds backed by an uploaded blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Audio,
}

impl MediaKind {
    pub fn table(self) -> &'static str {
        match self {
            MediaKind::Photo => "photos",
            MediaKind::Video => "videos",
            MediaKind::Audio => "audios",
        }
    }
}

/// Photo, video or audio memory with its author embedded.
/// `duration` is only ever set for audio.
#[derive(Debug, Clone, Serialize)]
pub struct MediaMemory {
    pub id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub guest_id: String,
    pub wedding_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub guest: Guest,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageMemory {
    pub id: String,
    pub content: String,
    pub guest_id: String,
    pub wedding_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub guest: Guest,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WeddingMemories {
    pub photos: Vec<MediaMemory>,
    pub videos: Vec<MediaMemory>,
    pub audios: Vec<MediaMemory>,
    pub messages: Vec<MessageMemory>,
}

// ---- write-side inputs ----

#[derive(Debug, Clone)]
pub struct NewWedding {
    pub id: String,
    pub groom_name: String,
    pub bride_name: String,
    pub date: String,
    pub location: String,
    pub banner_image: String,
    pub description: Option<String>,
    pub password: String,
    pub email: String,
    pub pin: String,
}

/// Column-wise changes for a wedding. `None` leaves the column untouched;
/// `description: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct WeddingChanges {
    pub groom_name: Option<String>,
    pub bride_name: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub banner_image: Option<String>,
    pub description: Option<Option<String>>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub pin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewGuest {
    pub id: String,
    pub name: String,
    pub wedding_id: String,
}

#[derive(Debug, Clone)]
pub struct NewMedia {
    pub id: String,
    pub kind: MediaKind,
    pub url: String,
    pub duration: Option<String>,
    pub guest_id: String,
    pub wedding_id: String,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub id: String,
    pub content: String,
    pub guest_id: String,
    pub wedding_id: String,
}
