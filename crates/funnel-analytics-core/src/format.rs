//! Locale-aware rendering of money, percentages and counts.
//!
//! Values are rounded half-up at render time only; nothing here feeds back
//! into calculations.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::FormatConfig;
use crate::types::{Money, Rate};

/// Fraction digits kept by [`format_number`].
pub const NUMBER_MAX_DECIMALS: u32 = 3;

/// `R$ 1.234,56` under the default config, with a no-break space (U+00A0)
/// after the symbol. Negative amounts put the sign before the symbol
/// (`-R$ 10,00`).
pub fn format_currency(value: Money, cfg: &FormatConfig) -> String {
    let (negative, digits) = render(value, cfg.currency_decimals, true, true, cfg);
    let sep = if cfg.symbol_spacing { "\u{a0}" } else { "" };
    let sign = if negative { "-" } else { "" };
    format!("{sign}{}{sep}{digits}", cfg.currency_symbol)
}

/// Percentage with a fixed number of decimals, e.g. `12,35%`.
///
/// `value` is already a percentage (12.345 renders as `12,35%`). No digit
/// grouping is applied.
pub fn format_percentage(value: Rate, decimals: u32, cfg: &FormatConfig) -> String {
    let (negative, digits) = render(value, decimals, true, false, cfg);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{digits}%")
}

/// Grouped number with at most three decimals and no trailing zeros.
pub fn format_number(value: Decimal, cfg: &FormatConfig) -> String {
    let (negative, digits) = render(value, NUMBER_MAX_DECIMALS, false, true, cfg);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{digits}")
}

/// Returns the sign separately so callers can place it around a symbol.
fn render(
    value: Decimal,
    decimals: u32,
    pad: bool,
    group: bool,
    cfg: &FormatConfig,
) -> (bool, String) {
    let rounded = value
        .abs()
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = value.is_sign_negative() && !rounded.is_zero();

    let plain = if pad {
        format!("{:.*}", decimals as usize, rounded)
    } else {
        rounded.normalize().to_string()
    };

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut out = if group {
        group_thousands(int_part, cfg.thousands_separator)
    } else {
        int_part.to_string()
    };
    if let Some(frac) = frac_part.filter(|f| !f.is_empty()) {
        out.push(cfg.decimal_separator);
        out.push_str(frac);
    }
    (negative, out)
}

fn group_thousands(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_pt_br() {
        let cfg = FormatConfig::default();
        assert_eq!(format_currency(dec!(1234.56), &cfg), "R$\u{a0}1.234,56");
        assert_eq!(format_currency(dec!(0), &cfg), "R$\u{a0}0,00");
        assert_eq!(format_currency(dec!(1234567.891), &cfg), "R$\u{a0}1.234.567,89");
        assert_eq!(format_currency(dec!(999.995), &cfg), "R$\u{a0}1.000,00");
    }

    #[test]
    fn test_currency_negative() {
        let cfg = FormatConfig::default();
        assert_eq!(format_currency(dec!(-10), &cfg), "-R$\u{a0}10,00");
        // rounds to zero, so no sign
        assert_eq!(format_currency(dec!(-0.001), &cfg), "R$\u{a0}0,00");
    }

    #[test]
    fn test_currency_en_us() {
        let cfg = FormatConfig::en_us();
        assert_eq!(format_currency(dec!(1234.5), &cfg), "$1,234.50");
    }

    #[test]
    fn test_percentage() {
        let cfg = FormatConfig::default();
        assert_eq!(format_percentage(dec!(12.345), 2, &cfg), "12,35%");
        assert_eq!(format_percentage(dec!(40), 1, &cfg), "40,0%");
        assert_eq!(format_percentage(dec!(33.333), 0, &cfg), "33%");
        assert_eq!(format_percentage(dec!(1500), 2, &cfg), "1500,00%");
        assert_eq!(format_percentage(dec!(12.345), 2, &FormatConfig::en_us()), "12.35%");
    }

    #[test]
    fn test_number() {
        let cfg = FormatConfig::default();
        assert_eq!(format_number(dec!(1234567), &cfg), "1.234.567");
        assert_eq!(format_number(dec!(1234.5), &cfg), "1.234,5");
        assert_eq!(format_number(dec!(0.12345), &cfg), "0,123");
        assert_eq!(format_number(dec!(-1000), &cfg), "-1.000");
        assert_eq!(format_number(dec!(12.000), &cfg), "12");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(group_thousands("1", '.'), "1");
        assert_eq!(group_thousands("123", '.'), "123");
        assert_eq!(group_thousands("1234", '.'), "1.234");
        assert_eq!(group_thousands("123456", '.'), "123.456");
    }
}
