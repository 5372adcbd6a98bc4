use crate::db::MediaKind;
use crate::error::{AppError, AppResult};
use crate::storage::BlobCategory;

impl MediaKind {
    pub fn blob_category(self) -> BlobCategory {
        match self {
            MediaKind::Photo => BlobCategory::Photos,
            MediaKind::Video => BlobCategory::Videos,
            MediaKind::Audio => BlobCategory::Audios,
        }
    }

    fn mime_prefix(self) -> &'static str {
        match self {
            MediaKind::Photo => "image/",
            MediaKind::Video => "video/",
            MediaKind::Audio => "audio/",
        }
    }

    fn mismatch_message(self) -> &'static str {
        match self {
            MediaKind::Photo => "File must be an image",
            MediaKind::Video => "File must be a video",
            MediaKind::Audio => "File must be an audio file",
        }
    }

    /// The declared content type must belong to this kind's top-level type.
    pub fn check_content_type(self, content_type: &str) -> AppResult<()> {
        let declared = content_type.trim().to_ascii_lowercase();
        if declared.starts_with(self.mime_prefix()) {
            Ok(())
        } else {
            Err(AppError::validation(self.mismatch_message()))
        }
    }
}
