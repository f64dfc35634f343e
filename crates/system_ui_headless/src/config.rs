//! Library-wide defaults that component props may override.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::placement::FloatingOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Hover-intent delays for tooltips.
pub struct TooltipDelays {
    /// Delay between pointer enter and open.
    pub open_delay_ms: u64,
    /// Delay between pointer leave and close.
    pub close_delay_ms: u64,
}

impl Default for TooltipDelays {
    fn default() -> Self {
        Self {
            open_delay_ms: 700,
            close_delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Defaults consulted by every `system_ui` component.
pub struct UiConfig {
    /// Popover and calendar placement defaults.
    pub floating: FloatingOptions,
    /// Tooltip placement defaults.
    pub tooltip_floating: FloatingOptions,
    /// Tooltip hover-intent delays.
    pub tooltip: TooltipDelays,
    /// Quiet period before a typed date is parsed and committed.
    pub date_input_debounce_ms: u64,
    /// Idle period after which select typeahead starts a new query.
    pub typeahead_reset_ms: u64,
    /// First weekday column of the calendar grid.
    pub week_start: Weekday,
    /// IANA zone used when a calendar input receives none.
    pub default_timezone: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            floating: FloatingOptions::default(),
            tooltip_floating: FloatingOptions {
                side: crate::placement::Side::Top,
                side_offset: 6.0,
                ..FloatingOptions::default()
            },
            tooltip: TooltipDelays::default(),
            date_input_debounce_ms: 500,
            typeahead_reset_ms: 1000,
            week_start: Weekday::Sun,
            default_timezone: "UTC".to_string(),
        }
    }
}

impl UiConfig {
    /// Parses a JSON config. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the payload is not valid config JSON.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::placement::Side;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = UiConfig::from_json(
            r#"{"tooltip":{"openDelayMs":200},"weekStart":"Mon","floating":{"side":"top"}}"#,
        )
        .expect("parse config");
        assert_eq!(config.tooltip.open_delay_ms, 200);
        assert_eq!(config.tooltip.close_delay_ms, 300);
        assert_eq!(config.week_start, Weekday::Mon);
        assert_eq!(config.floating.side, Side::Top);
        assert_eq!(config.floating.collision_padding, 8.0);
        assert_eq!(config.default_timezone, "UTC");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = UiConfig::from_json("{\"tooltip\": 3}").expect_err("shape mismatch");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
