/*!
 * Application configuration resolved from the process environment.
 *
 * Configuration is captured into a plain snapshot first and resolved from
 * that, so the resolution rules (required keys, backend selection,
 * defaults) stay testable without mutating the process environment.
 */

use std::net::SocketAddr;
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ConfigError;
use crate::gateway::DEFAULT_DEEPL_ENDPOINT;

/// Default chat model for the direct OpenAI backend.
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default Azure OpenAI API version.
const DEFAULT_AZURE_API_VERSION: &str = "2024-05-01-preview";

/// Default bind address for the HTTP server.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Default timeout for both external calls, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's level filter.
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(ConfigError::InvalidValue {
                key: "LOG_LEVEL",
                message: format!("unknown level '{}'", other),
            }),
        }
    }
}

/// Which evaluator backend the credentials select.
///
/// A direct OpenAI key wins over the Azure set; neither configured means
/// scoring is silently disabled.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluatorBackendConfig {
    /// Direct OpenAI chat-completions API
    OpenAI {
        /// API key
        api_key: String,
        /// Model name
        model: String,
    },
    /// Azure OpenAI enterprise gateway
    Azure {
        /// API key
        api_key: String,
        /// Resource endpoint
        endpoint: String,
        /// Chat deployment name
        deployment: String,
        /// API version query parameter
        api_version: String,
    },
    /// No credentials present; evaluator permanently disabled
    Disabled,
}

/// Raw environment snapshot, one field per recognized variable.
#[derive(Debug, Clone, Default)]
pub struct RawEnv {
    pub deepl_api_key: Option<String>,
    pub deepl_endpoint: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub azure_api_key: Option<String>,
    pub azure_endpoint: Option<String>,
    pub azure_deployment: Option<String>,
    pub azure_api_version: Option<String>,
    pub log_level: Option<String>,
    pub bind_addr: Option<String>,
    pub request_timeout_secs: Option<String>,
}

impl RawEnv {
    /// Capture the recognized variables from the process environment.
    ///
    /// Empty values count as unset.
    pub fn capture() -> Self {
        fn var(key: &str) -> Option<String> {
            std::env::var(key).ok().filter(|v| !v.trim().is_empty())
        }

        Self {
            deepl_api_key: var("DEEPL_API_KEY"),
            deepl_endpoint: var("DEEPL_ENDPOINT"),
            openai_api_key: var("OPENAI_API_KEY"),
            openai_model: var("OPENAI_MODEL"),
            azure_api_key: var("AZURE_OPENAI_API_KEY"),
            azure_endpoint: var("AZURE_OPENAI_ENDPOINT"),
            azure_deployment: var("AZURE_OPENAI_CHAT_DEPLOYMENT_NAME"),
            azure_api_version: var("AZURE_OPENAI_CHAT_DEPLOYMENT_VERSION"),
            log_level: var("LOG_LEVEL"),
            bind_addr: var("BIND_ADDR"),
            request_timeout_secs: var("REQUEST_TIMEOUT_SECS"),
        }
    }
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// DeepL API key (required)
    pub deepl_api_key: String,
    /// DeepL endpoint URL
    pub deepl_endpoint: String,
    /// Selected evaluator backend
    pub evaluator: EvaluatorBackendConfig,
    /// Log verbosity
    pub log_level: LogLevel,
    /// HTTP server bind address
    pub bind_addr: SocketAddr,
    /// Timeout applied to both external calls
    pub request_timeout: Duration,
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(RawEnv::capture())
    }

    /// Resolve configuration from a captured snapshot.
    pub fn resolve(raw: RawEnv) -> Result<Self, ConfigError> {
        let deepl_api_key = raw
            .deepl_api_key
            .clone()
            .ok_or(ConfigError::MissingKey("DEEPL_API_KEY"))?;

        let evaluator = Self::resolve_evaluator(&raw)?;

        let log_level = match raw.log_level {
            Some(value) => value.parse()?,
            None => LogLevel::default(),
        };

        let bind_addr = raw
            .bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                key: "BIND_ADDR",
                message: format!("{}", e),
            })?;

        let timeout_secs = match raw.request_timeout_secs {
            Some(value) => value.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                key: "REQUEST_TIMEOUT_SECS",
                message: format!("{}", e),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            deepl_api_key,
            deepl_endpoint: raw
                .deepl_endpoint
                .unwrap_or_else(|| DEFAULT_DEEPL_ENDPOINT.to_string()),
            evaluator,
            log_level,
            bind_addr,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn resolve_evaluator(raw: &RawEnv) -> Result<EvaluatorBackendConfig, ConfigError> {
        if let Some(api_key) = &raw.openai_api_key {
            return Ok(EvaluatorBackendConfig::OpenAI {
                api_key: api_key.clone(),
                model: raw
                    .openai_model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            });
        }

        if let (Some(api_key), Some(endpoint), Some(deployment)) = (
            &raw.azure_api_key,
            &raw.azure_endpoint,
            &raw.azure_deployment,
        ) {
            Url::parse(endpoint).map_err(|e| ConfigError::InvalidValue {
                key: "AZURE_OPENAI_ENDPOINT",
                message: format!("{}", e),
            })?;
            return Ok(EvaluatorBackendConfig::Azure {
                api_key: api_key.clone(),
                endpoint: endpoint.clone(),
                deployment: deployment.clone(),
                api_version: raw
                    .azure_api_version
                    .clone()
                    .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
            });
        }

        Ok(EvaluatorBackendConfig::Disabled)
    }
}
