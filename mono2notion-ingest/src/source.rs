//! Source loader: turns a local path or an uploaded object into a local
//! statement file the row parser can stream.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::SdkError;
use bytes::Bytes;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::IngestError;
use crate::event::ObjectRef;

const FALLBACK_FILE_NAME: &str = "statement.csv";

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, object: &ObjectRef) -> Result<Bytes, IngestError>;
}

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Build a client from the SDK default chain (env, profile, instance role).
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let shared_config = loader.load().await;
        Self {
            client: Client::new(&shared_config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, object: &ObjectRef) -> Result<Bytes, IngestError> {
        let output = self
            .client
            .get_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .send()
            .await
            .map_err(|err| match err {
                SdkError::ServiceError(service_err) if service_err.err().is_no_such_key() => {
                    IngestError::fetch(object.to_string(), "object not found")
                }
                other => IngestError::fetch(object.to_string(), other),
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| IngestError::fetch(object.to_string(), e))?;
        Ok(data.into_bytes())
    }
}

/// Local mode: the path is used as-is, it only has to exist.
pub fn local_statement(path: impl AsRef<Path>) -> Result<PathBuf, IngestError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(IngestError::fetch(
            path.display().to_string(),
            "file not found (pass --csv <path>)",
        ));
    }
    Ok(path.to_path_buf())
}

/// Scratch location for an object: the key's file name under `scratch_dir`.
///
/// Directory parts of the key are dropped so a key can never point outside
/// the scratch directory.
pub fn scratch_path(scratch_dir: &Path, key: &str) -> PathBuf {
    let name = Path::new(key)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(FALLBACK_FILE_NAME);
    scratch_dir.join(name)
}

/// Event mode: fetch the object and write it to scratch storage.
pub async fn fetch_to_scratch<S: ObjectStore + ?Sized>(
    store: &S,
    object: &ObjectRef,
    scratch_dir: &Path,
) -> Result<PathBuf, IngestError> {
    info!(%object, "fetching statement");
    let body = store.get_object(object).await?;

    let target = scratch_path(scratch_dir, &object.key);
    fs::create_dir_all(scratch_dir)
        .map_err(|e| IngestError::fetch(scratch_dir.display().to_string(), e))?;
    fs::write(&target, &body).map_err(|e| IngestError::fetch(target.display().to_string(), e))?;

    debug!(path = %target.display(), bytes = body.len(), "statement written to scratch");
    Ok(target)
}
