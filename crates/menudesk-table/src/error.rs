//! Error types for the table engine.
//!
//! # Design
//! - Gesture refusals are routine outcomes, not errors; only parsing,
//!   configuration and persistence failures surface here.

use thiserror::Error;

/// Textual row key could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    /// Key text did not contain the `kind:` prefix.
    #[error("row key is missing a kind prefix")]
    MissingKind {
        /// Raw key text provided by the caller.
        value: String,
    },
    /// Kind prefix did not name a known entity kind.
    #[error("unknown entity kind")]
    UnknownKind {
        /// Offending kind segment.
        value: String,
    },
    /// One of the id segments was empty.
    #[error("row key contains an empty id segment")]
    EmptySegment {
        /// Raw key text provided by the caller.
        value: String,
    },
}

/// Engine timing configuration was rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A timing field held an unusable value.
    #[error("invalid value for '{field}': {reason}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Value supplied, in milliseconds.
        value: u64,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// The configuration document did not match the expected shape.
    #[error("malformed engine timings document")]
    Malformed {
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

/// Injected reorder operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    /// The store refused the new order.
    #[error("reorder rejected: {reason}")]
    Rejected {
        /// Reason reported by the store.
        reason: String,
    },
    /// The store could not be reached.
    #[error("reorder store unavailable")]
    Unavailable,
}

/// Convenience alias for reorder results.
pub type ReorderResult<T> = Result<T, ReorderError>;
