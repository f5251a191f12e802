//! Event mode: an S3 upload notification in, an invocation response out.
//!
//! Success and failure share one response shape. Per-record delivery
//! failures still count as success (200); only invocation-level errors
//! (bad event, fetch, parse, config) produce a 500.

use anyhow::Result;
use mono2notion_core::PipelineConfig;
use mono2notion_delivery::{DeliveryEngine, DeliveryReport, PageTransport};
use mono2notion_ingest::{ObjectRef, ObjectStore, S3Event, S3ObjectStore, fetch_to_scratch};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::pipeline;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    /// JSON document, serialized to a string
    pub body: String,
}

impl InvocationResponse {
    pub fn success(report: &DeliveryReport) -> Self {
        Self {
            status_code: 200,
            body: json!({
                "message": "Data processed successfully",
                "delivered": report.delivered,
                "permanentlyFailed": report.permanently_failed,
                "fatal": report.fatal,
            })
            .to_string(),
        }
    }

    pub fn failure(err: &anyhow::Error) -> Self {
        Self {
            status_code: 500,
            body: json!({
                "message": "Error processing CSV",
                "error": format!("{err:#}"),
            })
            .to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Handle one notification end to end against S3 and Notion.
pub async fn invoke(event_json: &str, cfg: &PipelineConfig) -> InvocationResponse {
    respond(run(event_json, cfg).await)
}

async fn run(event_json: &str, cfg: &PipelineConfig) -> Result<DeliveryReport> {
    cfg.validate()?;
    let object = S3Event::from_json(event_json)?.first_object()?;
    let store = S3ObjectStore::from_env(cfg.storage.region.clone()).await;
    let engine = pipeline::notion_engine(cfg)?;
    process_object(&object, &store, cfg, &engine).await
}

/// Fetch the uploaded statement into scratch storage and run the pipeline on it.
pub async fn process_object<S, T>(
    object: &ObjectRef,
    store: &S,
    cfg: &PipelineConfig,
    engine: &DeliveryEngine<T>,
) -> Result<DeliveryReport>
where
    S: ObjectStore + ?Sized,
    T: PageTransport,
{
    let path = fetch_to_scratch(store, object, &cfg.storage.scratch_dir()).await?;
    pipeline::process_csv(&path, cfg, engine).await
}

pub fn respond(result: Result<DeliveryReport>) -> InvocationResponse {
    match result {
        Ok(report) => {
            info!(records = report.total(), failed = report.failed(), "invocation complete");
            InvocationResponse::success(&report)
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "error processing CSV");
            InvocationResponse::failure(&err)
        }
    }
}
