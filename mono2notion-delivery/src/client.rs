//! HTTP transport for the Notion pages endpoint.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;
use thiserror::Error;

use crate::error::DeliveryError;
use crate::payload::{CreatedPage, CreatePageRequest};

/// Longest error body kept for logs
const MAX_ERROR_BODY: usize = 500;

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid value for header {0}")]
    Header(&'static str),

    #[error("building HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Anything that can create one page per call.
#[async_trait]
pub trait PageTransport: Send + Sync {
    async fn create_page(&self, request: &CreatePageRequest) -> Result<CreatedPage, DeliveryError>;
}

pub struct NotionClient {
    http: reqwest::Client,
    pages_url: String,
}

impl NotionClient {
    pub fn new(
        api_base: &str,
        api_key: &str,
        notion_version: &str,
        timeout: Duration,
    ) -> Result<Self, ClientBuildError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| ClientBuildError::Header("Authorization"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "Notion-Version",
            HeaderValue::from_str(notion_version)
                .map_err(|_| ClientBuildError::Header("Notion-Version"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            pages_url: format!("{}/v1/pages", api_base.trim_end_matches('/')),
        })
    }

    pub fn pages_url(&self) -> &str {
        &self.pages_url
    }
}

#[async_trait]
impl PageTransport for NotionClient {
    async fn create_page(&self, request: &CreatePageRequest) -> Result<CreatedPage, DeliveryError> {
        let resp = self.http.post(&self.pages_url).json(request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body: String = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // The page exists at this point; a broken body must not trigger a resend.
        let bytes = resp.bytes().await.map_err(|e| {
            if e.is_timeout() {
                DeliveryError::Timeout(e.to_string())
            } else {
                DeliveryError::Decode(e.to_string())
            }
        })?;

        serde_json::from_slice(&bytes).map_err(|e| DeliveryError::Decode(e.to_string()))
    }
}
