// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};

use crate::app_config::Config;
use crate::pipeline::TranslationRequest;
use crate::server::AppState;

mod app_config;
mod errors;
mod evaluator;
mod gateway;
mod glossary;
mod pipeline;
mod providers;
mod server;

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP translation server (default command)
    Serve,

    /// Translate one text through the full pipeline and print the JSON result
    Translate {
        /// English source text
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Generate shell completions for vertaalbrug
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// vertaalbrug - glossary-enforced English to Dutch translation service
///
/// Translates text via DeepL with fixed terminology enforcement and scores
/// translation quality with an OpenAI or Azure OpenAI evaluator.
#[derive(Parser, Debug)]
#[command(name = "vertaalbrug")]
#[command(version)]
#[command(about = "Glossary-enforced EN->NL translation service with confidence scoring")]
#[command(long_about = "vertaalbrug translates English text to Dutch through the DeepL API,
enforcing a fixed terminology glossary before and after the provider call,
and optionally scores each translation against a five-criterion rubric
using an LLM evaluator.

EXAMPLES:
    vertaalbrug serve                           # Run the HTTP server
    vertaalbrug translate \"Quality of life\"     # One-shot pipeline run
    vertaalbrug --log-level debug serve         # Serve with debug logging
    vertaalbrug completions bash                # Generate bash completions

CONFIGURATION (environment, .env honored):
    DEEPL_API_KEY                      required
    OPENAI_API_KEY                     enables OpenAI confidence scoring
    AZURE_OPENAI_API_KEY / _ENDPOINT / _CHAT_DEPLOYMENT_NAME
                                       enables Azure OpenAI scoring
    LOG_LEVEL, BIND_ADDR, REQUEST_TIMEOUT_SECS   optional overrides")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Set logging level (overrides LOG_LEVEL)
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

/// Custom logger writing "timestamp | LEVEL | target | message" to stderr.
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} | {:5} | {} | {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Resolve configuration, install the logger and wire the pipeline.
///
/// Only the commands that actually talk to the outside world go through
/// here; completions generation needs none of it.
fn bootstrap(cli_level: Option<CliLogLevel>) -> Result<(Config, AppState)> {
    let config = Config::from_env()?;

    let log_level = cli_level
        .map(app_config::LogLevel::from)
        .unwrap_or(config.log_level);
    CustomLogger::init(log_level.to_level_filter())?;
    info!("Starting translation service");

    let state = AppState::from_config(&config);
    Ok((config, state))
}

#[tokio::main]
async fn main() -> Result<()> {
    // A .env file is honored in development; absence is fine.
    dotenvy::dotenv().ok();

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "vertaalbrug", &mut std::io::stdout());
        }
        Some(Commands::Translate { text }) => {
            let (_config, state) = bootstrap(cli.log_level)?;
            let response = state
                .pipeline()
                .run(TranslationRequest { text })
                .await
                .map_err(errors::AppError::from)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Some(Commands::Serve) | None => {
            let (config, state) = bootstrap(cli.log_level)?;
            server::serve(state, config.bind_addr).await?;
        }
    }

    Ok(())
}
