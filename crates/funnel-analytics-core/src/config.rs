use serde::{Deserialize, Serialize};

use crate::error::FunnelAnalyticsError;
use crate::FunnelAnalyticsResult;

/// Display conventions for currency, percentages and grouped numbers.
///
/// Defaults to the Brazilian convention (`R$ 1.234,56`). Any field omitted
/// from a config file keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub currency_symbol: String,
    pub decimal_separator: char,
    pub thousands_separator: char,
    /// Put a no-break space (U+00A0) between the symbol and the amount
    pub symbol_spacing: bool,
    pub currency_decimals: u32,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::pt_br()
    }
}

impl FormatConfig {
    pub fn pt_br() -> Self {
        FormatConfig {
            currency_symbol: "R$".to_string(),
            decimal_separator: ',',
            thousands_separator: '.',
            symbol_spacing: true,
            currency_decimals: 2,
        }
    }

    pub fn en_us() -> Self {
        FormatConfig {
            currency_symbol: "$".to_string(),
            decimal_separator: '.',
            thousands_separator: ',',
            symbol_spacing: false,
            currency_decimals: 2,
        }
    }

    /// Overlay `FUNNEL_*` environment variables on the defaults.
    pub fn from_env() -> FunnelAnalyticsResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> FunnelAnalyticsResult<Self> {
        let mut cfg = FormatConfig::default();

        if let Some(locale) = lookup("FUNNEL_LOCALE") {
            cfg = match locale.to_ascii_lowercase().replace('_', "-").as_str() {
                "pt-br" => FormatConfig::pt_br(),
                "en-us" => FormatConfig::en_us(),
                other => {
                    return Err(FunnelAnalyticsError::Config(format!(
                        "unsupported locale '{other}'"
                    )))
                }
            };
        }
        if let Some(symbol) = lookup("FUNNEL_CURRENCY_SYMBOL") {
            cfg.currency_symbol = symbol;
        }
        if let Some(sep) = lookup("FUNNEL_DECIMAL_SEPARATOR") {
            cfg.decimal_separator = single_char("FUNNEL_DECIMAL_SEPARATOR", &sep)?;
        }
        if let Some(sep) = lookup("FUNNEL_THOUSANDS_SEPARATOR") {
            cfg.thousands_separator = single_char("FUNNEL_THOUSANDS_SEPARATOR", &sep)?;
        }
        if let Some(spacing) = lookup("FUNNEL_SYMBOL_SPACING") {
            cfg.symbol_spacing = spacing.parse().map_err(|e| {
                FunnelAnalyticsError::Config(format!("invalid FUNNEL_SYMBOL_SPACING: {e}"))
            })?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> FunnelAnalyticsResult<()> {
        if self.decimal_separator == self.thousands_separator {
            return Err(FunnelAnalyticsError::Config(format!(
                "decimal and thousands separators must differ (both '{}')",
                self.decimal_separator
            )));
        }
        if self.currency_decimals > 8 {
            return Err(FunnelAnalyticsError::Config(
                "currency_decimals must be at most 8".to_string(),
            ));
        }
        Ok(())
    }
}

fn single_char(name: &str, value: &str) -> FunnelAnalyticsResult<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(FunnelAnalyticsError::Config(format!(
            "{name} must be a single character, got '{value}'"
        ))),
    }
}
