/*!
 * Error types for the vertaalbrug application.
 *
 * This module contains custom error types for the different stages of the
 * translation pipeline, using the thiserror crate for ergonomic error
 * definitions.
 */

use thiserror::Error;

/// Errors raised at start-up while resolving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing
    #[error("Missing required configuration: {0}")]
    MissingKey(&'static str),

    /// A configuration value could not be parsed
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Environment variable name
        key: &'static str,
        /// Description of what was wrong
        message: String,
    },
}

/// Errors that can occur when calling the translation provider
///
/// The distinction between `Unavailable` and `Api` is part of the HTTP
/// contract: an unreachable provider maps to 502, a reachable provider
/// that refused or garbled the request maps to 500.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The provider could not be reached or the request timed out
    #[error("Translation provider unavailable: {0}")]
    Unavailable(String),

    /// The provider responded with a non-success status
    #[error("Translation provider error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the provider
        status: u16,
        /// Error body from the provider
        message: String,
    },

    /// The provider returned a success status but the body did not carry a
    /// usable translation
    #[error("Malformed translation provider response: {0}")]
    MalformedResponse(String),
}

/// Errors that can occur when talking to an evaluator chat backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Why a confidence evaluation degraded to the all-zero breakdown
///
/// Never surfaced to callers; kept distinct so logs and tests can tell
/// "scoring is off" apart from "scoring ran and failed".
#[derive(Error, Debug)]
pub enum DegradeReason {
    /// No evaluator backend was configured at start-up
    #[error("confidence scoring is disabled (no backend configured)")]
    Disabled,

    /// The backend call itself failed
    #[error("evaluator backend error: {0}")]
    Backend(#[from] ProviderError),

    /// The model reply was not valid JSON
    #[error("malformed evaluator reply: {0}")]
    MalformedReply(String),

    /// The model reply was valid JSON but violated the score schema
    #[error("evaluator reply violated score schema: {0}")]
    SchemaViolation(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration resolution
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from the translation gateway
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
