//! Gesture timing configuration.
//!
//! # Design
//! - Documents carry millisecond integers; the engine works in `Duration`.
//! - Missing fields fall back to the defaults below, unknown fields are
//!   rejected so typos surface instead of silently using a default.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;

/// Default window for disambiguating single from double clicks.
pub const DEFAULT_CLICK_DELAY_MS: u64 = 200;
/// Default hover time before a collapsed group auto-expands during a drag.
pub const DEFAULT_HOVER_EXPAND_DELAY_MS: u64 = 500;
/// Default highlight window for a freshly auto-expanded group.
pub const DEFAULT_AUTO_EXPAND_FLASH_MS: u64 = 600;
/// Upper bound for the highlight window.
pub const MAX_AUTO_EXPAND_FLASH_MS: u64 = 10_000;

/// Timing knobs shared by the click and drag state machines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineTimings {
    /// Delay before a single click is released.
    pub click_delay: Duration,
    /// Hover time before a collapsed group expands under a drag.
    pub hover_expand_delay: Duration,
    /// How long an auto-expanded group stays flagged as fresh.
    pub auto_expand_flash: Duration,
    /// Collapse an auto-expanded group when the gesture ends without a drop.
    pub collapse_on_cancel: bool,
}

impl Default for EngineTimings {
    fn default() -> Self {
        Self {
            click_delay: Duration::from_millis(DEFAULT_CLICK_DELAY_MS),
            hover_expand_delay: Duration::from_millis(DEFAULT_HOVER_EXPAND_DELAY_MS),
            auto_expand_flash: Duration::from_millis(DEFAULT_AUTO_EXPAND_FLASH_MS),
            collapse_on_cancel: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTimings {
    #[serde(default = "default_click_delay_ms")]
    click_delay_ms: u64,
    #[serde(default = "default_hover_expand_delay_ms")]
    hover_expand_delay_ms: u64,
    #[serde(default = "default_auto_expand_flash_ms")]
    auto_expand_flash_ms: u64,
    #[serde(default = "default_collapse_on_cancel")]
    collapse_on_cancel: bool,
}

const fn default_click_delay_ms() -> u64 {
    DEFAULT_CLICK_DELAY_MS
}

const fn default_hover_expand_delay_ms() -> u64 {
    DEFAULT_HOVER_EXPAND_DELAY_MS
}

const fn default_auto_expand_flash_ms() -> u64 {
    DEFAULT_AUTO_EXPAND_FLASH_MS
}

const fn default_collapse_on_cancel() -> bool {
    true
}

impl EngineTimings {
    /// Parse and validate timings from a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Malformed`] when the document has the wrong
    /// shape and [`ConfigError::InvalidField`] when a value is out of range.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let raw = RawTimings::deserialize(value)
            .map_err(|source| ConfigError::Malformed { source })?;
        let timings = Self {
            click_delay: Duration::from_millis(raw.click_delay_ms),
            hover_expand_delay: Duration::from_millis(raw.hover_expand_delay_ms),
            auto_expand_flash: Duration::from_millis(raw.auto_expand_flash_ms),
            collapse_on_cancel: raw.collapse_on_cancel,
        };
        timings.validate()?;
        Ok(timings)
    }

    /// Check every timing is usable.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidField`] for zero delays or a highlight
    /// window longer than ten seconds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("click_delay_ms", self.click_delay)?;
        ensure_positive("hover_expand_delay_ms", self.hover_expand_delay)?;
        let flash = millis(self.auto_expand_flash);
        if flash > MAX_AUTO_EXPAND_FLASH_MS {
            return Err(ConfigError::InvalidField {
                field: "auto_expand_flash_ms",
                value: flash,
                reason: "must not exceed 10000",
            });
        }
        Ok(())
    }
}

fn ensure_positive(field: &'static str, value: Duration) -> Result<(), ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::InvalidField {
            field,
            value: 0,
            reason: "must be positive",
        });
    }
    Ok(())
}

fn millis(value: Duration) -> u64 {
    u64::try_from(value.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_document_uses_defaults() {
        let timings = EngineTimings::from_value(&json!({})).expect("defaults are valid");
        assert_eq!(timings, EngineTimings::default());
        assert_eq!(timings.click_delay, Duration::from_millis(200));
        assert_eq!(timings.hover_expand_delay, Duration::from_millis(500));
        assert_eq!(timings.auto_expand_flash, Duration::from_millis(600));
        assert!(timings.collapse_on_cancel);
    }

    #[test]
    fn overrides_are_applied() {
        let timings = EngineTimings::from_value(&json!({
            "click_delay_ms": 300,
            "collapse_on_cancel": false
        }))
        .expect("valid overrides");
        assert_eq!(timings.click_delay, Duration::from_millis(300));
        assert!(!timings.collapse_on_cancel);
    }

    #[test]
    fn zero_delay_is_rejected() {
        let err = EngineTimings::from_value(&json!({ "hover_expand_delay_ms": 0 }))
            .expect_err("zero delay");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "hover_expand_delay_ms",
                ..
            }
        ));
    }

    #[test]
    fn long_flash_is_rejected() {
        let err = EngineTimings::from_value(&json!({ "auto_expand_flash_ms": 10_001 }))
            .expect_err("flash too long");
        assert!(matches!(
            err,
            ConfigError::InvalidField { value: 10_001, .. }
        ));
    }

    #[test]
    fn unknown_or_mistyped_fields_are_malformed() {
        assert!(matches!(
            EngineTimings::from_value(&json!({ "click_delay": 200 })),
            Err(ConfigError::Malformed { .. })
        ));
        assert!(matches!(
            EngineTimings::from_value(&json!({ "click_delay_ms": "fast" })),
            Err(ConfigError::Malformed { .. })
        ));
    }
}
