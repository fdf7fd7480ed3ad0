//! Subscriber installation for hosts and test suites.
//!
//! # Design
//! - One global subscriber per process; a second install reports an error
//!   instead of replacing the first.
//! - `RUST_LOG` wins over the configured level when it is set.
//! - The first recorded build SHA sticks for the lifetime of the process.

use std::str::FromStr;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::TelemetryError;

/// Level used when neither `RUST_LOG` nor the configuration names one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const TEST_DIRECTIVES: &str = "menudesk_table=debug,menudesk_telemetry=info,warn";

static BUILD_SHA: OnceCell<String> = OnceCell::new();

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Multi-line human-readable events.
    Pretty,
    /// Single-line human-readable events.
    Compact,
}

impl LogFormat {
    /// Pretty in debug builds, JSON in release builds.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(TelemetryError::UnknownLogFormat {
                value: other.to_string(),
            }),
        }
    }
}

/// Logging settings for a host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `info` or `menudesk_table=debug`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
    /// Build identifier attached to table spans.
    pub build_sha: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::infer(),
            build_sha: None,
        }
    }
}

impl LoggingConfig {
    /// Read `log_level`, `log_format` and `build_sha` from a JSON object.
    ///
    /// Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns [`TelemetryError::MalformedSetting`] for non-string values,
    /// [`TelemetryError::UnknownLogFormat`] for unknown format names and
    /// [`TelemetryError::InvalidLevel`] when the level does not parse.
    pub fn from_value(value: &Value) -> crate::Result<Self> {
        let mut config = Self::default();
        if let Some(level) = string_setting(value, "log_level")? {
            parse_directives(level)?;
            config.level = level.to_string();
        }
        if let Some(format) = string_setting(value, "log_format")? {
            config.format = format.parse()?;
        }
        config.build_sha = string_setting(value, "build_sha")?.map(str::to_string);
        Ok(config)
    }
}

fn string_setting<'v>(value: &'v Value, field: &'static str) -> crate::Result<Option<&'v str>> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(_) => Err(TelemetryError::MalformedSetting { field }),
    }
}

fn parse_directives(level: &str) -> crate::Result<EnvFilter> {
    EnvFilter::try_new(level).map_err(|source| TelemetryError::InvalidLevel {
        level: level.to_string(),
        source,
    })
}

fn env_filter(level: &str) -> crate::Result<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| parse_directives(level))
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns an error when the level does not parse or a subscriber is already
/// installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    if let Some(sha) = &config.build_sha {
        let _ = BUILD_SHA.set(sha.clone());
    }
    let filter = env_filter(&config.level).context("logging level rejected")?;
    install(filter, config.format).context("logging initialisation failed")
}

fn install(filter: EnvFilter, format: LogFormat) -> crate::Result<()> {
    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty().with_target(false)).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact().with_target(false)).try_init(),
    };
    installed.map_err(|source| TelemetryError::SubscriberInstall { source })
}

/// Route engine logs through the test harness.
///
/// Every test may call this; only the first call in a binary installs.
pub fn init_test_logging() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(TEST_DIRECTIVES))
        .with(fmt::layer().with_test_writer().with_target(false))
        .try_init();
}

/// Build SHA recorded by [`init_logging`], or `dev`.
#[must_use]
pub fn build_sha() -> &'static str {
    BUILD_SHA.get().map_or("dev", String::as_str)
}
