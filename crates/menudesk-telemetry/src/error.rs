//! Failures raised while configuring logging.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised by telemetry helpers.
#[derive(Debug)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    SubscriberInstall {
        /// Underlying tracing subscriber error.
        source: TryInitError,
    },
    /// The level directive could not be parsed.
    InvalidLevel {
        /// Directive text as configured.
        level: String,
        /// Parser failure.
        source: ParseError,
    },
    /// A log format name was not recognised.
    UnknownLogFormat {
        /// Name supplied by configuration.
        value: String,
    },
    /// A logging setting had the wrong JSON type.
    MalformedSetting {
        /// Key of the offending setting.
        field: &'static str,
    },
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubscriberInstall { .. } => {
                formatter.write_str("a tracing subscriber is already installed")
            }
            Self::InvalidLevel { level, .. } => write!(formatter, "invalid log level '{level}'"),
            Self::UnknownLogFormat { value } => write!(formatter, "unknown log format '{value}'"),
            Self::MalformedSetting { field } => {
                write!(formatter, "logging setting '{field}' must be a string")
            }
        }
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SubscriberInstall { source } => Some(source),
            Self::InvalidLevel { source, .. } => Some(source),
            Self::UnknownLogFormat { .. } | Self::MalformedSetting { .. } => None,
        }
    }
}
