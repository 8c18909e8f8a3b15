// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selector configuration: user-facing strings, panel metrics, and placement.
//!
//! [`Config::default`] reproduces the stock documentation site. Hosts can
//! override any subset from JSON:
//!
//! ```
//! use docwords_selector::Config;
//!
//! let config = Config::from_json(r#"{ "fallback_label": "value" }"#).unwrap();
//! assert_eq!(config.fallback_label, "value");
//! assert_eq!(config.placeholder_token, "sntrys_YOUR_TOKEN_HERE");
//! ```

use kurbo::Size;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::placement::PositionOptions;

/// Page-wide selector configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shown when a keyword cannot be resolved.
    pub fallback_label: String,
    /// Shown in place of a token when the viewer is not signed in.
    pub placeholder_token: String,
    /// Label and tooltip of the idle token button.
    pub generate_label: String,
    /// Shown while a token is being issued.
    pub pending_label: String,
    /// Shown when issuance failed.
    pub failure_message: String,
    /// Header of the organization picker.
    pub org_picker_header: String,
    /// Prefix of the generated token name; the UTC date is appended.
    pub token_name_prefix: String,
    /// Panel measurements.
    pub panel: PanelMetrics,
    /// Placement options.
    pub position: PositionOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_label: "keyword".into(),
            placeholder_token: "sntrys_YOUR_TOKEN_HERE".into(),
            generate_label: "Click to generate token".into(),
            pending_label: "Generating token...".into(),
            failure_message: "There was an error while generating your token.".into(),
            org_picker_header: "Select an organization:".into(),
            token_name_prefix: "Generated by Docs on".into(),
            panel: PanelMetrics::default(),
            position: PositionOptions::default(),
        }
    }
}

impl Config {
    /// Decode a (possibly partial) config from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Config)
    }
}

/// Measurements used to size a dropdown panel before the host lays it out.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelMetrics {
    /// Minimum panel width.
    pub min_width: f64,
    /// Maximum panel height; longer lists scroll.
    pub max_height: f64,
    /// Height of one item row.
    pub item_height: f64,
    /// Height of the optional header.
    pub header_height: f64,
    /// Vertical padding above and below the item list.
    pub list_padding: f64,
}

impl Default for PanelMetrics {
    fn default() -> Self {
        Self {
            min_width: 300.0,
            max_height: 210.0,
            item_height: 22.0,
            header_height: 26.0,
            list_padding: 4.0,
        }
    }
}

impl PanelMetrics {
    /// Estimated size of a panel with `items` rows and an optional header.
    pub fn panel_size(&self, items: usize, has_header: bool) -> Size {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Item counts are far below f64's exact integer range."
        )]
        let list = (2.0 * self.list_padding + items as f64 * self.item_height).min(self.max_height);
        let header = if has_header { self.header_height } else { 0.0 };
        Size::new(self.min_width, list + header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::Side;

    #[test]
    fn defaults_match_site() {
        let c = Config::default();
        assert_eq!(c.fallback_label, "keyword");
        assert_eq!(c.position.side, Side::Bottom);
        assert_eq!(c.position.distance, 10.0);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let c = Config::from_json(r#"{"position": {"side": "top"}, "panel": {"min_width": 200}}"#)
            .unwrap();
        assert_eq!(c.position.side, Side::Top);
        assert_eq!(c.position.distance, 10.0);
        assert_eq!(c.panel.min_width, 200.0);
        assert_eq!(c.panel.max_height, 210.0);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let err = Config::from_json(r#"{"fallback_label": 3}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().starts_with("invalid selector config"));
    }

    #[test]
    fn panel_size_caps_height() {
        let m = PanelMetrics::default();
        assert_eq!(m.panel_size(2, false), Size::new(300.0, 52.0));
        assert_eq!(m.panel_size(2, true), Size::new(300.0, 78.0));
        assert_eq!(m.panel_size(100, false).height, 210.0);
    }
}
