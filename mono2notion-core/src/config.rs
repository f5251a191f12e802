//! Pipeline configuration passed into every stage.
//!
//! Values come from a TOML file and the environment at the binary boundary;
//! nothing here reads the environment itself.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

use crate::time::StatementZone;

pub const DEFAULT_API_BASE: &str = "https://api.notion.com";
pub const DEFAULT_NOTION_VERSION: &str = "2021-08-16";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing Notion API key (set notion.api_key or NOTION_API_KEY)")]
    MissingApiKey,

    #[error("missing Notion database (set notion.database_id, notion.database_url, NOTION_DB_ID or NOTION_DB_URL)")]
    MissingDatabase,

    #[error("cannot derive database id from '{url}': {reason}")]
    DatabaseUrl { url: String, reason: String },

    #[error("delimiter must be a single ASCII character, got '{0}'")]
    Delimiter(char),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub notion: NotionSection,
    pub statement: StatementSection,
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionSection {
    pub api_key: Option<String>,
    /// Shared database link, e.g. `https://www.notion.so/<workspace>/<id>?v=...`
    pub database_url: Option<String>,
    /// Takes precedence over `database_url`
    pub database_id: Option<String>,
    pub api_base: String,
    pub version: String,
    pub timeout_ms: u64,
    pub retry: RetrySection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySection {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementSection {
    pub timezone: StatementZone,
    pub delimiter: char,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Where fetched objects land (defaults to the system temp dir)
    pub scratch_dir: Option<PathBuf>,
    /// AWS region override; the SDK default chain applies when unset
    pub region: Option<String>,
}

impl Default for NotionSection {
    fn default() -> Self {
        Self {
            api_key: None,
            database_url: None,
            database_id: None,
            api_base: DEFAULT_API_BASE.to_string(),
            version: DEFAULT_NOTION_VERSION.to_string(),
            timeout_ms: 5_000,
            retry: RetrySection::default(),
        }
    }
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 2_000,
        }
    }
}

impl Default for StatementSection {
    fn default() -> Self {
        Self {
            timezone: StatementZone::Local,
            delimiter: ',',
        }
    }
}

impl NotionSection {
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// The target database id: explicit id first, then the shared URL.
    pub fn database_id(&self) -> Result<String, ConfigError> {
        if let Some(id) = self.database_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            return Ok(id.to_string());
        }
        match self.database_url.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(url) => extract_database_id(url),
            None => Err(ConfigError::MissingDatabase),
        }
    }
}

impl StatementSection {
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ConfigError::Delimiter(self.delimiter))
        }
    }
}

impl StorageSection {
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl PipelineConfig {
    /// Fail fast on anything delivery would trip over later.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.notion.api_key()?;
        self.notion.database_id()?;
        self.statement.delimiter_byte()?;
        Ok(())
    }
}

/// Take the database id from a shared database URL.
///
/// The id is the second non-empty path segment:
/// `https://www.notion.so/acme/c7dd435944114d54a3bed9d6e76bc832?v=...`
/// yields `c7dd435944114d54a3bed9d6e76bc832`.
pub fn extract_database_id(url: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(url).map_err(|e| ConfigError::DatabaseUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    parsed
        .path_segments()
        .and_then(|mut segments| segments.filter(|s| !s.trim().is_empty()).nth(1))
        .map(str::to_string)
        .ok_or_else(|| ConfigError::DatabaseUrl {
            url: url.to_string(),
            reason: "expected /<workspace>/<database-id> path".to_string(),
        })
}
