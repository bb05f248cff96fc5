use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;

use super::{HttpClient, HttpResponse};
use crate::config::HttpConfig;
use crate::{Result, TranscriptError};

/// reqwest-backed HTTP client with a fixed per-request timeout
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> std::result::Result<HttpResponse, TranscriptError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            TranscriptError::Download(format!("Network error while requesting {}: {}", url, e))
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            TranscriptError::Download(format!("Failed to read response body from {}: {}", url, e))
        })?;

        Ok(HttpResponse { status, body })
    }
}
