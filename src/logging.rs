//! Logging via the tracing crate.
//!
//! Logs go to stderr so stdout stays clean for `--json` output. `RUST_LOG`
//! takes precedence over the level picked from `--verbose`.

use std::io;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Logging output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoggingFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingConfig {
    pub format: LoggingFormat,
    /// Raise the default level from `warn` to `info`.
    pub verbose: bool,
}

impl LoggingConfig {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            format: if json {
                LoggingFormat::Json
            } else {
                LoggingFormat::Text
            },
            verbose,
        }
    }

    pub fn default_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::INFO
        } else {
            LevelFilter::WARN
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(self.default_level().into())
            .from_env_lossy()
    }
}

/// Install the global subscriber.
///
/// Call once per process; a second call fails because the subscriber is global.
pub fn init_with_config(config: &LoggingConfig) -> anyhow::Result<()> {
    match config.format {
        LoggingFormat::Text => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_writer(io::stderr)
                .with_env_filter(config.filter())
                .with_target(false)
                .finish(),
        )?,
        LoggingFormat::Json => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_writer(io::stderr)
                .with_env_filter(config.filter())
                .json()
                .finish(),
        )?,
    }

    Ok(())
}
