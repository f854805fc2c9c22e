use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::Serialize;

use super::openai::OpenAIResponse;
use super::{ChatBackend, ChatMessage, ChatRequest};
use crate::errors::ProviderError;

/// Azure OpenAI client, the enterprise-gateway variant of the OpenAI API
///
/// Same message and response schema as the direct API, but addressed by
/// resource endpoint + deployment name, versioned via a query parameter,
/// and authenticated with an `api-key` header instead of a bearer token.
#[derive(Debug)]
pub struct AzureOpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Azure resource endpoint, e.g. https://my-resource.openai.azure.com
    endpoint: String,
    /// Deployment name, which doubles as the model selector
    deployment: String,
    /// API version query parameter
    api_version: String,
}

/// Azure chat completion request (the deployment path selects the model)
#[derive(Debug, Serialize)]
struct AzureRequest {
    /// The messages for the conversation
    messages: Vec<ChatMessage>,
    /// Temperature for generation
    temperature: f32,
}

impl AzureOpenAI {
    /// Create a new Azure OpenAI client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            deployment: deployment.into(),
            api_version: api_version.into(),
        }
    }

    fn api_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

#[async_trait]
impl ChatBackend for AzureOpenAI {
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let body = AzureRequest {
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user,
                },
            ],
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(self.api_url())
            .header("Content-Type", "application/json")
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Azure OpenAI API error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let parsed = response
            .json::<OpenAIResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::ParseError("no choices in response".to_string()))
    }

    fn name(&self) -> &'static str {
        "azure-openai"
    }
}
