use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context};
use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::{blob_key, BlobCategory, BlobStore};

/// URL path the upload directory is served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Blobs on the local filesystem, one sub-directory per category.
///
/// References are `/uploads/<category>/<file>` URL paths, independent of
/// where the directory lives on disk.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub async fn new(root: PathBuf) -> anyhow::Result<Self> {
        for category in [BlobCategory::Photos, BlobCategory::Videos, BlobCategory::Audios] {
            let dir = root.join(category.as_str());
            fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("create upload dir {}", dir.display()))?;
        }
        info!("blob storage directory: {}", root.display());
        Ok(Self { root })
    }

    /// Map a reference back to a file, refusing anything outside the root.
    fn resolve(&self, reference: &str) -> anyhow::Result<PathBuf> {
        let Some(key) = reference
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            bail!("reference {reference:?} is not an upload path");
        };
        let relative = Path::new(key);
        if key.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            bail!("reference {reference:?} is not a plain upload path");
        }
        Ok(self.root.join(relative))
    }
}

/// Write the whole body, removing the file again if that fails midway.
async fn fill<W>(path: &Path, mut file: W, body: &[u8]) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        file.write_all(body).await?;
        file.flush().await
    }
    .await;
    if let Err(e) = written {
        if let Err(rm) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %rm, "failed to remove partial blob");
        }
        return Err(e).with_context(|| format!("write {}", path.display()));
    }
    Ok(())
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(
        &self,
        category: BlobCategory,
        file_name: &str,
        body: Bytes,
        _content_type: &str,
    ) -> anyhow::Result<String> {
        let key = blob_key(category, file_name, OffsetDateTime::now_utc());
        let path = self.root.join(&key);

        let file = fs::File::create(&path)
            .await
            .with_context(|| format!("create {}", path.display()))?;
        fill(&path, file, &body).await?;

        debug!(path = %path.display(), size = body.len(), "blob stored");
        Ok(format!("{PUBLIC_PREFIX}/{key}"))
    }

    async fn delete(&self, reference: &str) -> anyhow::Result<()> {
        let path = self.resolve(reference)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "blob already gone");
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }
}
