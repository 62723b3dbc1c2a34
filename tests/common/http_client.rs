//! HTTP client helpers for tests.

use relate::classifier::ThresholdUpdates;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// Gradio-style call; returns the verdict integer and the status header.
    pub async fn predict(
        &self,
        query: &str,
        snippet: &str,
        thresholds: Option<&ThresholdUpdates>,
    ) -> Result<(i8, String), TestClientError> {
        let body = serde_json::json!({ "data": [query, snippet, thresholds] });
        let resp = self
            .client
            .post(self.url("/run/predict"))
            .json(&body)
            .send()
            .await?;

        let status_header = status_header(&resp);

        match resp.status().as_u16() {
            200 => {
                let body: PredictResponse = resp.json().await?;
                let verdict = body
                    .data
                    .first()
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| TestClientError::BadRequest(format!("{:?}", body.data)))?;
                Ok((verdict, status_header))
            }
            400 => Err(TestClientError::BadRequest(resp.text().await?)),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TestClientError::UnexpectedStatus(status, body))
            }
        }
    }

    pub async fn related(
        &self,
        query: &str,
        snippet: &str,
    ) -> Result<serde_json::Value, TestClientError> {
        let resp = self
            .client
            .post(self.url("/v1/related"))
            .json(&serde_json::json!({ "query": query, "snippet": snippet }))
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn thresholds(&self) -> Result<BTreeMap<String, [f32; 2]>, TestClientError> {
        let resp = self.client.get(self.url("/v1/thresholds")).send().await?;
        Ok(resp.error_for_status()?.json().await?)
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    /// `HEAD /`, the up-check legacy clients use.
    pub async fn is_up(&self) -> bool {
        matches!(
            self.client.head(self.url("/")).send().await,
            Ok(resp) if resp.status().is_success()
        )
    }
}

fn status_header(resp: &reqwest::Response) -> String {
    resp.headers()
        .get("x-relate-status")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictResponse {
    pub data: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub stages: Vec<String>,
    pub embedder_mode: String,
    pub reranker_mode: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}
