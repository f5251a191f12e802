use anyhow::{Context, Result};
use mono2notion_core::{CanonicalRecord, PipelineConfig};
use mono2notion_delivery::{
    DeliveryEngine, DeliveryReport, NotionClient, PageTransport, RetryPolicy,
};
use mono2notion_ingest::read_statement;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub fn notion_engine(cfg: &PipelineConfig) -> Result<DeliveryEngine<NotionClient>> {
    let client = NotionClient::new(
        &cfg.notion.api_base,
        cfg.notion.api_key()?,
        &cfg.notion.version,
        Duration::from_millis(cfg.notion.timeout_ms),
    )
    .context("building Notion client")?;

    Ok(DeliveryEngine::new(
        client,
        cfg.notion.database_id()?,
        RetryPolicy::from(&cfg.notion.retry),
    ))
}

/// Parse and normalize a statement; any bad row fails the whole file.
pub fn load_records(path: &Path, cfg: &PipelineConfig) -> Result<Vec<CanonicalRecord>> {
    let delimiter = cfg.statement.delimiter_byte()?;
    read_statement(path, delimiter, &cfg.statement.timezone)
        .with_context(|| format!("processing {}", path.display()))
}

pub async fn process_csv<T: PageTransport>(
    path: &Path,
    cfg: &PipelineConfig,
    engine: &DeliveryEngine<T>,
) -> Result<DeliveryReport> {
    let records = load_records(path, cfg)?;
    info!(path = %path.display(), records = records.len(), "statement normalized");
    Ok(engine.deliver_all(&records).await)
}
