use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::{CompletionRequest, CompletionResponse, GenerationParameters, InferenceError};
use crate::audio::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamHealth {
    Healthy,
    Unhealthy,
    Unreachable,
}

/// Language model serving endpoint that turns a prompt into raw token IDs.
#[async_trait]
pub trait TokenGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        parameters: &GenerationParameters,
    ) -> Result<Vec<Token>, InferenceError>;

    async fn health(&self) -> UpstreamHealth;
}

pub struct VllmClient {
    base_url: String,
    model: String,
    request_timeout: Duration,
    health_timeout: Duration,
    http: reqwest::Client,
}

impl VllmClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        request_timeout: Duration,
        health_timeout: Duration,
    ) -> Result<Self, InferenceError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|error| InferenceError::Unreachable(format!("failed to build http client: {error}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            request_timeout,
            health_timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn map_transport_error(
        &self,
        error: reqwest::Error,
    ) -> InferenceError {
        if error.is_timeout() {
            return InferenceError::Timeout {
                timeout_ms: self.request_timeout.as_millis() as u64,
            };
        }
        InferenceError::Unreachable(error.to_string())
    }
}

#[async_trait]
impl TokenGenerator for VllmClient {
    async fn generate(
        &self,
        prompt: &str,
        parameters: &GenerationParameters,
    ) -> Result<Vec<Token>, InferenceError> {
        let request = CompletionRequest::new(&self.model, prompt, parameters);
        let response = self
            .http
            .post(format!("{}/v1/completions", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|error| self.map_transport_error(error))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|error| self.map_transport_error(error))?;
        if !status.is_success() {
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        CompletionResponse::from_slice(&body)?.into_token_ids()
    }

    async fn health(&self) -> UpstreamHealth {
        let response = self.http.get(format!("{}/health", self.base_url)).timeout(self.health_timeout).send().await;

        match response {
            Ok(response) if response.status().is_success() => UpstreamHealth::Healthy,
            Ok(response) => {
                log::debug!("inference endpoint health returned {}", response.status());
                UpstreamHealth::Unhealthy
            },
            Err(error) => {
                log::debug!("inference endpoint health check failed: {error}");
                UpstreamHealth::Unreachable
            },
        }
    }
}
