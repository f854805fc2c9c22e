/*!
 * Translation gateway wrapping the DeepL HTTP API.
 *
 * The gateway owns request construction, timeout handling and upstream
 * failure classification. Glossary substitution runs on both sides of the
 * provider call: once on the source text so canonical terms reach DeepL in
 * their fixed Dutch form, and once on the returned candidate to re-assert
 * terms the provider may have altered.
 */

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde::Deserialize;

use crate::errors::GatewayError;
use crate::glossary::Glossary;

/// Default DeepL Pro endpoint.
pub const DEFAULT_DEEPL_ENDPOINT: &str = "https://api.deepl.com/v2/translate";

/// Capability interface for the translation provider call.
///
/// The pipeline depends only on this trait so tests can substitute a
/// scripted translator without touching the network.
#[async_trait]
pub trait Translator: Send + Sync + std::fmt::Debug {
    /// Translate English text to Dutch, enforcing glossary terms.
    async fn translate(&self, text: &str) -> Result<String, GatewayError>;

    /// Translate Dutch text back to English, without glossary enforcement.
    ///
    /// Exists for round-trip spot checks; scoring never runs on this path.
    async fn back_translate(&self, text: &str) -> Result<String, GatewayError>;
}

/// One translation candidate in a DeepL response.
#[derive(Debug, Deserialize)]
pub struct DeepLTranslation {
    /// The translated text
    pub text: String,
}

/// Body of a successful DeepL response.
#[derive(Debug, Deserialize)]
pub struct DeepLResponse {
    /// Translation candidates; the first one is the result
    #[serde(default)]
    pub translations: Vec<DeepLTranslation>,
}

/// DeepL client with glossary enforcement.
#[derive(Debug)]
pub struct DeepLClient {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Endpoint URL
    endpoint: String,
    /// Glossary applied before and after the provider call
    glossary: Arc<Glossary>,
}

impl DeepLClient {
    /// Create a new DeepL client with the given request timeout.
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        glossary: Arc<Glossary>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            glossary,
        }
    }

    /// Call DeepL for one language pair and return the raw candidate text.
    async fn request(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, GatewayError> {
        let form = [
            ("text", text),
            ("source_lang", source_lang),
            ("target_lang", target_lang),
            // Inline markup must be preserved structurally, not translated.
            ("tag_handling", "html"),
            ("preserve_formatting", "1"),
        ];

        debug!("Sending request to DeepL ({} -> {})", source_lang, target_lang);
        let response = self
            .client
            .post(&self.endpoint)
            .header(
                "Authorization",
                format!("DeepL-Auth-Key {}", self.api_key),
            )
            .form(&form)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        info!("DeepL response status {}", status);
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("DeepL API error ({}): {}", status, body);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await.map_err(|e| {
            GatewayError::MalformedResponse(format!("failed to read response body: {}", e))
        })?;
        extract_translation(&body)
    }
}

#[async_trait]
impl Translator for DeepLClient {
    async fn translate(&self, text: &str) -> Result<String, GatewayError> {
        debug!(
            "Received text (len={}). Pre-processing with glossary",
            text.len()
        );
        let preprocessed = self.glossary.apply(text);

        let dutch = self.request(&preprocessed, "EN", "NL").await?;

        debug!(
            "Raw Dutch output (len={}). Applying glossary again",
            dutch.len()
        );
        Ok(self.glossary.apply(&dutch))
    }

    async fn back_translate(&self, text: &str) -> Result<String, GatewayError> {
        self.request(text, "NL", "EN").await
    }
}

/// Map a reqwest transport failure onto the gateway taxonomy.
///
/// Timeouts and connection failures mean the provider is unreachable;
/// anything else on the send path is still a transport problem rather than
/// a provider verdict, so it classifies the same way.
fn classify_transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Unavailable(format!("request timed out: {}", error))
    } else if error.is_connect() {
        GatewayError::Unavailable(format!("connection failed: {}", error))
    } else {
        GatewayError::Unavailable(error.to_string())
    }
}

/// Extract the first translation candidate from a DeepL success body.
///
/// A 2xx body without `translations[0].text` is a fatal error for the
/// call, never silently defaulted.
pub fn extract_translation(body: &str) -> Result<String, GatewayError> {
    let parsed: DeepLResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    parsed
        .translations
        .into_iter()
        .next()
        .map(|t| t.text)
        .ok_or_else(|| {
            GatewayError::MalformedResponse("empty translations array".to_string())
        })
}
