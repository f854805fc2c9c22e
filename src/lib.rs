/*!
 * # vertaalbrug
 *
 * A Rust backend for glossary-enforced English → Dutch translation with
 * LLM-based confidence scoring.
 *
 * ## Features
 *
 * - Translate text via the DeepL API, preserving inline markup
 * - Enforce a fixed medical/pharma terminology glossary via longest-first
 *   pre/post substitution
 * - Score translation quality against a five-criterion rubric using an
 *   OpenAI or Azure OpenAI backend, degrading safely to zero scores when
 *   scoring is unavailable
 * - Reverse-direction back-translation for round-trip spot checks
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Environment-based configuration resolution
 * - `glossary`: Terminology table and the ordered substitution engine
 * - `gateway`: DeepL client behind the `Translator` trait
 * - `providers`: Chat backend clients for the evaluator:
 *   - `providers::openai`: direct OpenAI API client
 *   - `providers::azure`: Azure OpenAI API client
 * - `evaluator`: Rubric-based quality scoring with degrade-to-zero policy
 * - `pipeline`: The translate-then-score orchestrator
 * - `server`: Thin axum HTTP surface
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod evaluator;
pub mod gateway;
pub mod glossary;
pub mod pipeline;
pub mod providers;
pub mod server;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ConfigError, DegradeReason, GatewayError, ProviderError};
pub use evaluator::{ConfidenceBreakdown, Evaluation, Evaluator};
pub use gateway::{DeepLClient, Translator};
pub use glossary::Glossary;
pub use pipeline::{Pipeline, PipelineResponse, TranslationRequest};
