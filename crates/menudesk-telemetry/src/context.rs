//! Span helpers for table interactions.
//!
//! # Design
//! - One span per mounted table carries the table name and build SHA.
//! - The `gesture` field starts empty; the table engine records the active
//!   gesture on the current span so its events nest under it.

use tracing::Span;
use tracing::field::Empty;

use crate::init::build_sha;

/// Span covering the lifetime of one mounted table.
#[must_use]
pub fn table_span(table: &str) -> Span {
    tracing::info_span!("menu_table", table = %table, build_sha = %build_sha(), gesture = Empty)
}
