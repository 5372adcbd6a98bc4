use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use time::OffsetDateTime;

use super::{blob_key, BlobCategory, BlobStore};
use crate::config::S3Config;

/// Blobs in an S3-compatible bucket (MinIO in development).
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    public_base_url: Option<String>,
}

impl S3BlobStore {
    pub async fn new(cfg: &S3Config) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(Credentials::new(
                &cfg.access_key,
                &cfg.secret_key,
                None,
                None,
                "static",
            ))
            .endpoint_url(&cfg.endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: cfg.bucket.clone(),
            public_base_url: cfg.public_base_url.clone(),
        })
    }

    fn reference_for(&self, key: &str) -> String {
        reference_for(self.public_base_url.as_deref(), key)
    }

    fn key_for<'a>(&self, reference: &'a str) -> &'a str {
        key_for(self.public_base_url.as_deref(), reference)
    }
}

fn reference_for(public_base_url: Option<&str>, key: &str) -> String {
    match public_base_url {
        Some(base) => format!("{}/{}", base, key),
        None => key.to_string(),
    }
}

fn key_for<'a>(public_base_url: Option<&str>, reference: &'a str) -> &'a str {
    public_base_url
        .and_then(|base| reference.strip_prefix(base))
        .map(|rest| rest.trim_start_matches('/'))
        .unwrap_or(reference)
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn store(
        &self,
        category: BlobCategory,
        file_name: &str,
        body: Bytes,
        content_type: &str,
    ) -> anyhow::Result<String> {
        let key = blob_key(category, file_name, OffsetDateTime::now_utc());
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .with_context(|| format!("s3 put_object {}", key))?;
        Ok(self.reference_for(&key))
    }

    async fn delete(&self, reference: &str) -> anyhow::Result<()> {
        let key = self.key_for(reference);
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("s3 delete_object {}", key))?;
        Ok(())
    }
}
