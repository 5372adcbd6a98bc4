use std::path::PathBuf;

use anyhow::{bail, Context};

#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub enum BlobConfig {
    Local { dir: PathBuf },
    S3(S3Config),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub blob: BlobConfig,
    pub max_upload_bytes: usize,
    pub message_max_chars: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL").context("DATABASE_URL is not set")?;

        let blob = match get("BLOB_BACKEND").as_deref().unwrap_or("local") {
            "local" => BlobConfig::Local {
                dir: PathBuf::from(get("UPLOAD_DIR").unwrap_or_else(|| "uploads".into())),
            },
            "s3" => {
                let required = |key: &str| get(key).with_context(|| format!("{key} is not set"));
                BlobConfig::S3(S3Config {
                    endpoint: required("S3_ENDPOINT")?,
                    bucket: required("S3_BUCKET")?,
                    access_key: required("S3_ACCESS_KEY")?,
                    secret_key: required("S3_SECRET_KEY")?,
                    region: get("S3_REGION").unwrap_or_else(|| "us-east-1".into()),
                    public_base_url: get("S3_PUBLIC_BASE_URL")
                        .map(|u| u.trim_end_matches('/').to_string()),
                })
            }
            other => bail!("unknown BLOB_BACKEND {other:?}, expected \"local\" or \"s3\""),
        };

        Ok(Self {
            database_url,
            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 10)?,
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: match get("APP_PORT").or_else(|| get("PORT")) {
                Some(v) => v.parse().with_context(|| format!("invalid port {v:?}"))?,
                None => 8080,
            },
            blob,
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", 100 * 1024 * 1024)?,
            message_max_chars: parse_or(&get, "MESSAGE_MAX_CHARS", 5000)?,
        })
    }
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(v) => v.parse::<T>().with_context(|| format!("invalid {key} {v:?}")),
        None => Ok(default),
    }
}
