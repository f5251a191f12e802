//! S3 upload notifications.
//!
//! Only the first record of a notification is used: one upload, one statement.

use percent_encoding::percent_decode_str;
use serde::Deserialize;

use crate::error::IngestError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3Event {
    #[serde(default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Object {
    /// URL-encoded form-style: spaces arrive as `+`
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// A decoded (bucket, key) pair ready for lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

impl S3Event {
    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        serde_json::from_str(json).map_err(|e| IngestError::fetch("event", e))
    }

    pub fn first_object(&self) -> Result<ObjectRef, IngestError> {
        let record = self
            .records
            .first()
            .ok_or_else(|| IngestError::fetch("event", "notification has no records"))?;

        Ok(ObjectRef {
            bucket: record.s3.bucket.name.clone(),
            key: decode_object_key(&record.s3.object.key)?,
        })
    }
}

/// Undo S3's key encoding: `+` becomes a space, then `%XX` escapes are decoded.
pub fn decode_object_key(raw: &str) -> Result<String, IngestError> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|key| key.into_owned())
        .map_err(|e| IngestError::fetch(raw, format!("object key is not UTF-8: {e}")))
}
