//! mono2notion-delivery: Notion page payloads, HTTP transport and retrying delivery engine

pub mod client;
pub mod engine;
pub mod error;
pub mod payload;
pub mod retry;

pub use client::{ClientBuildError, NotionClient, PageTransport};
pub use engine::{DeliveryEngine, DeliveryOutcome, DeliveryReport};
pub use error::DeliveryError;
pub use payload::{CreatePageRequest, CreatedPage};
pub use retry::{RetryError, RetryPolicy, retry_with_backoff};
