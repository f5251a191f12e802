//! mono2notion-core: canonical record, statement time handling and pipeline configuration

pub mod config;
pub mod record;
pub mod time;

pub use config::{
    extract_database_id, ConfigError, NotionSection, PipelineConfig, RetrySection,
    StatementSection, StorageSection,
};
pub use record::CanonicalRecord;
pub use time::{
    parse_statement_timestamp, statement_timestamp_to_iso8601, to_iso8601_utc, DateFormatError,
    StatementZone,
};
