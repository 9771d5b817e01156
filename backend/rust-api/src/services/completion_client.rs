use reqwest::Client;
use std::time::Duration;

use crate::{
    config::AiConfig,
    error::{CompletionError, ProxyError},
    models::completion::{ChatCompletionRequest, ChatCompletionResponse, PromptPair, ToolSpec},
};

/// Thin client for the chat-completion gateway. One call per request, no retries.
#[derive(Clone)]
pub struct CompletionClient {
    http_client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl CompletionClient {
    pub fn new(config: &AiConfig) -> Result<Self, ProxyError> {
        if config.api_key.trim().is_empty() {
            return Err(ProxyError::Configuration(
                "AI_GATEWAY_API_KEY is not configured".to_string(),
            ));
        }

        let http_client = Client::builder()
            .user_agent(concat!("studyportal-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProxyError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout: config.timeout(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends the two-message conversation and forces the model to answer
    /// through `tool`. Non-2xx responses surface as `CompletionError::Status`;
    /// a 2xx body that is not JSON surfaces as `CompletionError::MalformedBody`.
    pub async fn call_tool(
        &self,
        prompts: PromptPair,
        tool: &ToolSpec,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let payload = ChatCompletionRequest::forced_tool_call(&self.model, prompts, tool);

        tracing::debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            tool = tool.name,
            "Calling completion API"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CompletionError::Status { status, body });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(CompletionError::MalformedBody)
    }
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
