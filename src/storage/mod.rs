use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::warn;

use crate::config::BlobConfig;

pub mod local;
pub mod s3;

pub use local::LocalBlobStore;
pub use s3::S3BlobStore;

/// Top-level folder a blob is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobCategory {
    Photos,
    Videos,
    Audios,
}

impl BlobCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            BlobCategory::Photos => "photos",
            BlobCategory::Videos => "videos",
            BlobCategory::Audios => "audios",
        }
    }
}

impl fmt::Display for BlobCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque store for uploaded bytes.
///
/// `store` returns the reference string that ends up in a memory's `url`;
/// `delete` takes that same reference back.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(
        &self,
        category: BlobCategory,
        file_name: &str,
        body: Bytes,
        content_type: &str,
    ) -> anyhow::Result<String>;

    async fn delete(&self, reference: &str) -> anyhow::Result<()>;
}

pub async fn from_config(cfg: &BlobConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match cfg {
        BlobConfig::Local { dir } => Arc::new(LocalBlobStore::new(dir.clone()).await?),
        BlobConfig::S3(s3) => Arc::new(S3BlobStore::new(s3).await?),
    };
    Ok(store)
}

/// Best-effort removal of blobs whose records are gone or never committed.
/// Failures are logged and swallowed.
pub async fn discard(store: &dyn BlobStore, references: &[String]) {
    for reference in references {
        if let Err(e) = store.delete(reference).await {
            warn!(error = %e, %reference, "failed to delete blob");
        }
    }
}

/// `<category>/<unix nanos>_<file name>`, unique per upload.
pub fn blob_key(category: BlobCategory, file_name: &str, now: OffsetDateTime) -> String {
    format!(
        "{}/{}_{}",
        category,
        now.unix_timestamp_nanos(),
        sanitize_file_name(file_name)
    )
}

/// Keep only the last path component and a conservative character set.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
