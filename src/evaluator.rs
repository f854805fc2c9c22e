/*!
 * LLM-backed translation quality evaluator.
 *
 * Scores a (source, translation) pair against five rubric criteria by
 * delegating to a chat backend. Scoring is advisory: every failure mode
 * degrades to the all-zero breakdown instead of reaching the caller, so
 * the primary translation response is never blocked by the evaluator.
 */

use std::sync::Arc;

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use crate::errors::DegradeReason;
use crate::glossary::Glossary;
use crate::providers::{ChatBackend, ChatRequest};

/// Rubric instruction for the scoring model.
///
/// Five one-line criterion definitions, an anchored 0-1 scale with explicit
/// deductions, a reasoning-suppression instruction, and a strict
/// output-schema directive. Paired with a JSON user payload at temperature
/// zero for determinism.
const RUBRIC_PROMPT: &str = r#"You are a senior English to Dutch translation quality evaluator.

Rate the candidate Dutch translation on five criteria, each from 0.0 to 1.0:
1. accuracy - meaning preserved exactly.
2. fluency - grammatical, natural Dutch.
3. terminology_adherence - correct medical/brand terms.
4. consistency - repeated phrases rendered the same.
5. glossary_support - uses every glossary mapping provided.

Scoring guide:
Start at 1.00 and deduct per issue: 0.05 per minor issue, 0.15 per major issue.
1.0 = flawless; 0.8 = minor issue; 0.5 = acceptable but notable flaws; 0.2 = major errors; 0.0 = unusable.

After scoring, compute overall = arithmetic mean of the five values and round ALL numbers to two decimals.

Think through each criterion silently; do NOT output reasoning.
Respond with ONLY the following JSON schema (no markdown, no keys added or omitted):

{
  "accuracy": <float>,
  "fluency": <float>,
  "terminology_adherence": <float>,
  "consistency": <float>,
  "glossary_support": <float>,
  "overall": <float>
}"#;

/// Five-dimension quality score plus derived overall.
///
/// All six fields forced to 0.0 is the deliberate degraded-mode value used
/// whenever scoring cannot be performed reliably, not a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfidenceBreakdown {
    /// Meaning preserved exactly
    pub accuracy: f64,
    /// Grammatical, natural Dutch
    pub fluency: f64,
    /// Correct domain and brand terms
    pub terminology_adherence: f64,
    /// Repeated phrases rendered the same
    pub consistency: f64,
    /// Every glossary mapping honored
    pub glossary_support: f64,
    /// Arithmetic mean of the five criteria, rounded to two decimals
    pub overall: f64,
}

impl ConfidenceBreakdown {
    /// The degraded-mode breakdown: all six fields zero.
    pub fn zero() -> Self {
        Self {
            accuracy: 0.0,
            fluency: 0.0,
            terminology_adherence: 0.0,
            consistency: 0.0,
            glossary_support: 0.0,
            overall: 0.0,
        }
    }

    /// Build a breakdown from the five component scores, deriving overall.
    pub fn from_components(
        accuracy: f64,
        fluency: f64,
        terminology_adherence: f64,
        consistency: f64,
        glossary_support: f64,
    ) -> Self {
        let mean =
            (accuracy + fluency + terminology_adherence + consistency + glossary_support) / 5.0;
        Self {
            accuracy,
            fluency,
            terminology_adherence,
            consistency,
            glossary_support,
            overall: round2(mean),
        }
    }
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Outcome of one evaluation attempt.
///
/// `Scored` and `Degraded` surface identically to callers (degraded
/// collapses to the zero breakdown), but staying distinguishable here lets
/// logs and tests tell "evaluator ran and scored low" from "evaluator did
/// not run".
#[derive(Debug)]
pub enum Evaluation {
    /// The backend produced a valid breakdown
    Scored(ConfidenceBreakdown),
    /// Scoring could not be performed; collapses to the zero breakdown
    Degraded(DegradeReason),
}

impl Evaluation {
    /// Collapse to the single value type exposed at the pipeline boundary.
    pub fn into_breakdown(self) -> ConfidenceBreakdown {
        match self {
            Evaluation::Scored(breakdown) => breakdown,
            Evaluation::Degraded(_) => ConfidenceBreakdown::zero(),
        }
    }

    /// Whether this outcome carries a real score.
    pub fn is_scored(&self) -> bool {
        matches!(self, Evaluation::Scored(_))
    }
}

/// Translation quality evaluator.
///
/// Holds the backend selected at process start, or none at all when no
/// credentials were configured, in which case evaluation is permanently
/// disabled and no external call is ever made.
#[derive(Debug)]
pub struct Evaluator {
    backend: Option<Arc<dyn ChatBackend>>,
}

impl Evaluator {
    /// Create an evaluator delegating to the given backend.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Create a permanently-disabled evaluator.
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    /// Whether a backend is configured.
    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Score a translation pair against the rubric. Never raises.
    pub async fn evaluate(
        &self,
        source_text: &str,
        translated_text: &str,
        glossary: &Glossary,
    ) -> Evaluation {
        let outcome = self.try_evaluate(source_text, translated_text, glossary).await;
        if let Evaluation::Degraded(reason) = &outcome {
            match reason {
                DegradeReason::Disabled => {
                    debug!("Confidence scoring disabled; returning zero breakdown")
                }
                other => error!("Confidence scoring degraded: {}", other),
            }
        }
        outcome
    }

    async fn try_evaluate(
        &self,
        source_text: &str,
        translated_text: &str,
        glossary: &Glossary,
    ) -> Evaluation {
        let Some(backend) = &self.backend else {
            return Evaluation::Degraded(DegradeReason::Disabled);
        };

        let payload = serde_json::json!({
            "source_en": source_text,
            "candidate_nl": translated_text,
            "glossary": glossary.as_map(),
        });

        let request = ChatRequest::new(RUBRIC_PROMPT, payload.to_string()).temperature(0.0);

        debug!("Requesting confidence scores from {} backend", backend.name());
        let reply = match backend.complete(request).await {
            Ok(reply) => reply,
            Err(e) => return Evaluation::Degraded(DegradeReason::Backend(e)),
        };

        match parse_scores(&reply) {
            Ok(breakdown) => Evaluation::Scored(breakdown),
            Err(reason) => Evaluation::Degraded(reason),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        warn!("No evaluator backend configured - confidence scoring will be disabled");
        Self::disabled()
    }
}

/// Raw score object as returned by the model, all six keys required.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScores {
    accuracy: f64,
    fluency: f64,
    terminology_adherence: f64,
    consistency: f64,
    glossary_support: f64,
    overall: f64,
}

/// Parse and validate a model reply against the score schema.
///
/// Missing or extra keys and out-of-range values are schema violations.
/// `overall` is recomputed from the five components so the mean invariant
/// holds regardless of what the model claimed.
fn parse_scores(reply: &str) -> Result<ConfidenceBreakdown, DegradeReason> {
    let raw: RawScores = serde_json::from_str(reply.trim())
        .map_err(|e| DegradeReason::MalformedReply(e.to_string()))?;

    let breakdown = ConfidenceBreakdown::from_components(
        raw.accuracy,
        raw.fluency,
        raw.terminology_adherence,
        raw.consistency,
        raw.glossary_support,
    );

    for (name, value) in [
        ("accuracy", raw.accuracy),
        ("fluency", raw.fluency),
        ("terminology_adherence", raw.terminology_adherence),
        ("consistency", raw.consistency),
        ("glossary_support", raw.glossary_support),
        ("overall", raw.overall),
    ] {
        if !(0.0..=1.0).contains(&value) || !value.is_finite() {
            return Err(DegradeReason::SchemaViolation(format!(
                "{} = {} is outside [0.0, 1.0]",
                name, value
            )));
        }
    }

    Ok(breakdown)
}
