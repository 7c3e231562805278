//! Normalization of weekly spreadsheet rows.
//!
//! Cells arrive as loosely typed JSON (numbers, strings with currency
//! symbols, blanks, spreadsheet error markers). Anything that cannot be read
//! as a number counts as zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::metrics::{ratio, round_pct, safe_div};
use crate::types::{Money, Multiple, Rate};

// ---------------------------------------------------------------------------
// Row layout
// ---------------------------------------------------------------------------

/// Column 0 holds the week label and is not read.
pub mod columns {
    pub const STUDENTS: usize = 1;
    pub const QUALIFIED: usize = 2;
    pub const SCHEDULED: usize = 3;
    pub const CALLS_DONE: usize = 4;
    pub const SALES: usize = 5;
    pub const INVESTED: usize = 6;
    pub const TRAFFIC_REVENUE: usize = 7;
    pub const FUNNEL_REVENUE: usize = 8;
    pub const TRAFFIC_ROAS: usize = 9;
    pub const FUNNEL_ROAS: usize = 10;
    pub const MONETIZATION_SALES: usize = 11;
    pub const CASH_IN: usize = 12;
    pub const FUNNEL_PROFIT: usize = 13;
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSummary {
    pub students: Decimal,
    pub qualified: Decimal,
    pub scheduled: Decimal,
    pub calls_done: Decimal,
    pub sales: Decimal,
    pub invested: Money,
    pub traffic_revenue: Money,
    pub funnel_revenue: Money,
    pub traffic_roas: Multiple,
    pub funnel_roas: Multiple,
    pub monetization_sales: Decimal,
    pub cash_in: Money,
    /// Read from the sheet, or `funnel_revenue - invested` when the cell is empty
    pub funnel_profit: Money,
    /// sales / students, percent
    pub conversion_rate: Rate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekTotals {
    pub weeks: usize,
    pub students: Decimal,
    pub qualified: Decimal,
    pub scheduled: Decimal,
    pub calls_done: Decimal,
    pub sales: Decimal,
    pub invested: Money,
    pub traffic_revenue: Money,
    pub funnel_revenue: Money,
    pub funnel_profit: Money,
    pub monetization_sales: Decimal,
    pub cash_in: Money,
    /// Recomputed from the summed columns
    pub conversion_rate: Rate,
    /// funnel_revenue / invested over the summed columns
    pub funnel_roas: Multiple,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Read one cell as a number, falling back to zero.
///
/// Strings keep only digits, `.` and `-`, then the longest leading numeric
/// literal is parsed (`"R$ 1.5k"` reads as 1.5, `"#DIV/0!"` as 0).
pub fn parse_cell(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else if let Some(u) = n.as_u64() {
                Decimal::from(u)
            } else {
                // exponent forms like 1e21 fall through to the f64 path
                Decimal::from_str(&n.to_string())
                    .ok()
                    .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok()))
                    .unwrap_or(Decimal::ZERO)
            }
        }
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            numeric_prefix(&cleaned).unwrap_or(Decimal::ZERO)
        }
        Value::Bool(true) => Decimal::ONE,
        _ => Decimal::ZERO,
    }
}

/// Longest prefix of the form `-?digits(.digits)?` with at least one digit.
fn numeric_prefix(s: &str) -> Option<Decimal> {
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut literal = String::new();

    if bytes.first() == Some(&b'-') {
        literal.push('-');
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = &s[int_start..end];

    let mut frac_digits = "";
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        frac_digits = &s[frac_start..frac_end];
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }
    literal.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        literal.push('.');
        literal.push_str(frac_digits);
    }
    Decimal::from_str(&literal).ok()
}

fn cell(row: &[Value], index: usize) -> Decimal {
    row.get(index).map(parse_cell).unwrap_or(Decimal::ZERO)
}

/// Normalize one weekly row. Short rows read missing columns as zero.
pub fn parse_week_row(row: &[Value]) -> WeekSummary {
    use columns::*;

    let students = cell(row, STUDENTS);
    let sales = cell(row, SALES);
    let invested = cell(row, INVESTED);
    let funnel_revenue = cell(row, FUNNEL_REVENUE);

    let mut funnel_profit = cell(row, FUNNEL_PROFIT);
    if funnel_profit.is_zero() && funnel_revenue > Decimal::ZERO {
        funnel_profit = funnel_revenue.saturating_sub(invested);
    }

    WeekSummary {
        students,
        qualified: cell(row, QUALIFIED),
        scheduled: cell(row, SCHEDULED),
        calls_done: cell(row, CALLS_DONE),
        sales,
        invested,
        traffic_revenue: cell(row, TRAFFIC_REVENUE),
        funnel_revenue,
        traffic_roas: cell(row, TRAFFIC_ROAS),
        funnel_roas: cell(row, FUNNEL_ROAS),
        monetization_sales: cell(row, MONETIZATION_SALES),
        cash_in: cell(row, CASH_IN),
        funnel_profit,
        conversion_rate: round_pct(ratio(sales, students)),
    }
}

/// Column sums across weeks.
pub fn week_totals(weeks: &[WeekSummary]) -> WeekTotals {
    let mut totals = weeks.iter().fold(WeekTotals::default(), |mut t, w| {
        t.weeks += 1;
        t.students = t.students.saturating_add(w.students);
        t.qualified = t.qualified.saturating_add(w.qualified);
        t.scheduled = t.scheduled.saturating_add(w.scheduled);
        t.calls_done = t.calls_done.saturating_add(w.calls_done);
        t.sales = t.sales.saturating_add(w.sales);
        t.invested = t.invested.saturating_add(w.invested);
        t.traffic_revenue = t.traffic_revenue.saturating_add(w.traffic_revenue);
        t.funnel_revenue = t.funnel_revenue.saturating_add(w.funnel_revenue);
        t.funnel_profit = t.funnel_profit.saturating_add(w.funnel_profit);
        t.monetization_sales = t.monetization_sales.saturating_add(w.monetization_sales);
        t.cash_in = t.cash_in.saturating_add(w.cash_in);
        t
    });
    totals.conversion_rate = round_pct(ratio(totals.sales, totals.students));
    totals.funnel_roas = round_pct(safe_div(totals.funnel_revenue, totals.invested));
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_cell_variants() {
        assert_eq!(parse_cell(&json!(42)), dec!(42));
        assert_eq!(parse_cell(&json!(2.5)), dec!(2.5));
        assert_eq!(parse_cell(&json!("R$ 1500")), dec!(1500));
        assert_eq!(parse_cell(&json!("-12.5%")), dec!(-12.5));
        assert_eq!(parse_cell(&json!("")), Decimal::ZERO);
        assert_eq!(parse_cell(&json!("#DIV/0!")), Decimal::ZERO);
        assert_eq!(parse_cell(&json!("#N/A")), Decimal::ZERO);
        assert_eq!(parse_cell(&Value::Null), Decimal::ZERO);
    }

    #[test]
    fn test_parse_cell_takes_leading_literal() {
        // "1.234.56" has two dots; only "1.234" is a literal
        assert_eq!(parse_cell(&json!("1.234.56")), dec!(1.234));
        assert_eq!(parse_cell(&json!(".5")), dec!(0.5));
        assert_eq!(parse_cell(&json!("--3")), Decimal::ZERO);
    }

    fn row() -> Vec<Value> {
        json!([
            "Semana 1", "200", "80", "40", "30", "6", "R$ 1000", "2500", "3000",
            "2.5", "3", "4", "1800", ""
        ])
        .as_array()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_week_row() {
        let w = parse_week_row(&row());
        assert_eq!(w.students, dec!(200));
        assert_eq!(w.sales, dec!(6));
        assert_eq!(w.invested, dec!(1000));
        assert_eq!(w.conversion_rate, dec!(3));
        // profit cell blank, derived from revenue - invested
        assert_eq!(w.funnel_profit, dec!(2000));
    }

    #[test]
    fn test_week_row_keeps_sheet_profit() {
        let mut r = row();
        r[13] = json!("1234");
        assert_eq!(parse_week_row(&r).funnel_profit, dec!(1234));
    }

    #[test]
    fn test_short_row_and_zero_students() {
        let w = parse_week_row(&[json!("Semana 2")]);
        assert_eq!(w, WeekSummary::default());
    }

    #[test]
    fn test_week_totals() {
        let w = parse_week_row(&row());
        let t = week_totals(&[w.clone(), w]);
        assert_eq!(t.weeks, 2);
        assert_eq!(t.students, dec!(400));
        assert_eq!(t.funnel_profit, dec!(4000));
        assert_eq!(t.conversion_rate, dec!(3));
        assert_eq!(t.funnel_roas, dec!(3));
        assert_eq!(week_totals(&[]), WeekTotals::default());
    }

    #[test]
    fn test_week_totals_saturate() {
        let w = WeekSummary {
            students: Decimal::MAX,
            invested: Decimal::MAX,
            funnel_revenue: Decimal::MAX,
            ..Default::default()
        };
        let t = week_totals(&[w.clone(), w]);
        assert_eq!(t.students, Decimal::MAX);
        assert_eq!(t.invested, Decimal::MAX);
        assert_eq!(t.funnel_roas, dec!(1));
    }
}
