#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Logging setup shared by the menudesk crates.
//!
//! Installs the tracing subscriber from a JSON logging section, remembers the
//! build SHA and offers span helpers for table interactions.

pub mod context;
pub mod error;
pub mod init;

pub use context::table_span;
pub use error::{Result, TelemetryError};
pub use init::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging, init_test_logging,
};
