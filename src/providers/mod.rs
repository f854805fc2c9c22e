/*!
 * Chat backend implementations for confidence scoring.
 *
 * This module contains client implementations for the LLM backends the
 * evaluator can delegate to:
 * - OpenAI: direct chat-completions API
 * - Azure OpenAI: enterprise-gateway variant of the same API family
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A single chat turn sent to or received from a backend.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

/// Backend-agnostic chat completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// System instruction guiding the model
    pub system: String,
    /// User message carrying the data payload
    pub user: String,
    /// Sampling temperature; 0.0 for deterministic scoring
    pub temperature: f32,
}

impl ChatRequest {
    /// Create a new request with the given system and user messages.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.0,
        }
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Common trait for evaluator chat backends
///
/// The evaluator depends only on this interface, allowing the two provider
/// variants (and test doubles) to be used interchangeably.
#[async_trait]
pub trait ChatBackend: Send + Sync + Debug {
    /// Complete a chat request and return the assistant message content.
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError>;

    /// Short name of the backend, for logging.
    fn name(&self) -> &'static str;
}

pub mod azure;
pub mod openai;

pub use azure::AzureOpenAI;
pub use openai::OpenAI;
