//! Delivery engine: one page per record, strictly in order.
//!
//! Each record runs its own retry loop to completion before the next one
//! starts. A failing record is logged and skipped; it never stops the batch.

use mono2notion_core::CanonicalRecord;
use serde::Serialize;
use tracing::{error, info};

use crate::client::PageTransport;
use crate::error::DeliveryError;
use crate::payload::CreatePageRequest;
use crate::retry::{RetryError, RetryPolicy, retry_with_backoff};

#[derive(Debug)]
pub enum DeliveryOutcome {
    Delivered { page_id: String, attempts: u32 },
    PermanentlyFailed { attempts: u32, error: DeliveryError },
    Fatal { error: DeliveryError },
}

/// Per-invocation tally of outcomes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub permanently_failed: usize,
    pub fatal: usize,
}

impl DeliveryReport {
    pub fn total(&self) -> usize {
        self.delivered + self.permanently_failed + self.fatal
    }

    pub fn failed(&self) -> usize {
        self.permanently_failed + self.fatal
    }

    fn record(&mut self, outcome: &DeliveryOutcome) {
        match outcome {
            DeliveryOutcome::Delivered { .. } => self.delivered += 1,
            DeliveryOutcome::PermanentlyFailed { .. } => self.permanently_failed += 1,
            DeliveryOutcome::Fatal { .. } => self.fatal += 1,
        }
    }
}

pub struct DeliveryEngine<T> {
    transport: T,
    database_id: String,
    policy: RetryPolicy,
}

impl<T: PageTransport> DeliveryEngine<T> {
    pub fn new(transport: T, database_id: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            database_id: database_id.into(),
            policy,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Deliver one record. Never returns an error: failures become outcomes.
    pub async fn deliver(&self, record: &CanonicalRecord) -> DeliveryOutcome {
        let request = CreatePageRequest::for_record(&self.database_id, record);

        match retry_with_backoff(&self.policy, || self.transport.create_page(&request)).await {
            Ok((page, attempts)) => {
                info!(date = %record.timestamp, page_id = %page.id, attempts, "row sent to Notion");
                DeliveryOutcome::Delivered {
                    page_id: page.id,
                    attempts,
                }
            }
            Err(RetryError::Exhausted { attempts, error }) => {
                error!(
                    date = %record.timestamp,
                    attempts,
                    %error,
                    "failed to send row to Notion after multiple retries"
                );
                DeliveryOutcome::PermanentlyFailed { attempts, error }
            }
            Err(RetryError::Fatal { attempts, error }) => {
                error!(
                    date = %record.timestamp,
                    attempts,
                    %error,
                    "failed to send row to Notion, not retrying"
                );
                DeliveryOutcome::Fatal { error }
            }
        }
    }

    pub async fn deliver_all(&self, records: &[CanonicalRecord]) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for record in records {
            let outcome = self.deliver(record).await;
            report.record(&outcome);
        }
        info!(
            delivered = report.delivered,
            permanently_failed = report.permanently_failed,
            fatal = report.fatal,
            "delivery finished"
        );
        report
    }
}
