/*!
 * Pipeline orchestrator composing gateway, evaluator and glossary into the
 * end-to-end translate-then-score flow.
 *
 * Translation is mandatory: gateway failures propagate to the caller
 * immediately, with no retries at this layer. Scoring is advisory: the
 * evaluator runs only after a successful translation and can never fail
 * the call.
 */

use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::GatewayError;
use crate::evaluator::{ConfidenceBreakdown, Evaluator};
use crate::gateway::Translator;
use crate::glossary::Glossary;

/// Caller-supplied source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Source text; may contain inline markup, preserved structurally
    pub text: String,
}

/// The full externally visible result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResponse {
    /// The glossary-enforced Dutch translation
    pub dutch: String,
    /// Advisory quality scores; all zero when scoring was unavailable
    pub confidence: ConfidenceBreakdown,
}

/// The translate-then-score pipeline.
///
/// Holds only shared read-only state (glossary, gateway, evaluator), so
/// concurrent runs need no locking.
#[derive(Debug)]
pub struct Pipeline {
    translator: Arc<dyn Translator>,
    evaluator: Evaluator,
    glossary: Arc<Glossary>,
}

impl Pipeline {
    /// Assemble a pipeline from its collaborators.
    pub fn new(
        translator: Arc<dyn Translator>,
        evaluator: Evaluator,
        glossary: Arc<Glossary>,
    ) -> Self {
        Self {
            translator,
            evaluator,
            glossary,
        }
    }

    /// Run the full translate-then-score flow for one request.
    ///
    /// The evaluator receives the original source text, not the
    /// glossary-preprocessed form sent to the provider.
    pub async fn run(&self, request: TranslationRequest) -> Result<PipelineResponse, GatewayError> {
        let dutch = self.translator.translate(&request.text).await?;
        info!("Translation completed (output len={})", dutch.len());

        let evaluation = self
            .evaluator
            .evaluate(&request.text, &dutch, &self.glossary)
            .await;
        debug!("Evaluation scored: {}", evaluation.is_scored());

        Ok(PipelineResponse {
            dutch,
            confidence: evaluation.into_breakdown(),
        })
    }

    /// Reverse-direction translation for round-trip spot checks.
    ///
    /// No glossary enforcement and no scoring on this path.
    pub async fn back_translate(&self, text: &str) -> Result<String, GatewayError> {
        self.translator.back_translate(text).await
    }
}
