use serde::Deserialize;

use crate::betslip::Betslip;
use crate::brand::Bookmaker;
use crate::format::{Currency, OddsFormat};

/// Id of the optional `<script type="application/json">` block holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "betslip-config";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub preview_element_id: String,
    /// Device-pixel multiplier handed to the rasterizer.
    pub pixel_ratio: f64,
    pub background: String,
    pub toast_duration_ms: u32,
    pub share_text: String,
    pub default_currency: Currency,
    pub default_bookmaker: Bookmaker,
    pub default_odds_format: OddsFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            preview_element_id: "betslip-preview".into(),
            pixel_ratio: 2.0,
            background: "#ffffff".into(),
            toast_duration_ms: 3_000,
            share_text: "Check out my betslip!".into(),
            default_currency: Currency::DEFAULT,
            default_bookmaker: Bookmaker::Bet365,
            default_odds_format: OddsFormat::Decimal,
        }
    }
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<AppConfig, serde_json::Error> {
        let mut config: AppConfig = serde_json::from_str(raw)?;
        if !(config.pixel_ratio.is_finite() && config.pixel_ratio > 0.0) {
            config.pixel_ratio = AppConfig::default().pixel_ratio;
        }
        Ok(config)
    }

    /// Reads the inline config block, falling back to defaults.
    pub fn load() -> AppConfig {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());
        let Some(raw) = raw else {
            return AppConfig::default();
        };
        match AppConfig::from_json(&raw) {
            Ok(config) => config,
            Err(err) => {
                gloo::console::warn!(format!("ignoring malformed #{}: {}", CONFIG_ELEMENT_ID, err));
                AppConfig::default()
            }
        }
    }

    pub fn blank_betslip(&self) -> Betslip {
        let slip = Betslip::blank();
        Betslip {
            bookmaker: self.default_bookmaker,
            currency: self.default_currency,
            odds_format: self.default_odds_format,
            ..slip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = AppConfig::from_json(r#"{ "pixel_ratio": 3, "default_currency": "USD" }"#).unwrap();
        assert_eq!(config.pixel_ratio, 3.0);
        assert_eq!(config.default_currency, Currency::Usd);
        assert_eq!(config.preview_element_id, "betslip-preview");
        assert_eq!(config.background, "#ffffff");
    }

    #[test]
    fn enum_fields_use_lowercase_tags() {
        let config = AppConfig::from_json(
            r#"{ "default_bookmaker": "draftkings", "default_odds_format": "american" }"#,
        )
        .unwrap();
        assert_eq!(config.default_bookmaker, Bookmaker::DraftKings);
        assert_eq!(config.default_odds_format, OddsFormat::American);
    }

    #[test]
    fn nonsense_pixel_ratio_is_replaced() {
        let config = AppConfig::from_json(r#"{ "pixel_ratio": -1 }"#).unwrap();
        assert_eq!(config.pixel_ratio, 2.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(AppConfig::from_json("{ pixel_ratio: ").is_err());
        assert!(AppConfig::from_json(r#"{ "default_currency": "JPY" }"#).is_err());
    }

    #[test]
    fn blank_betslip_follows_configured_defaults() {
        let config = AppConfig {
            default_bookmaker: Bookmaker::BetMgm,
            default_currency: Currency::Usd,
            default_odds_format: OddsFormat::American,
            ..AppConfig::default()
        };
        let slip = config.blank_betslip();
        assert_eq!(slip.bookmaker, Bookmaker::BetMgm);
        assert_eq!(slip.currency, Currency::Usd);
        assert_eq!(slip.odds_format, OddsFormat::American);
        assert_eq!(slip.selections.len(), 1);
    }
}
