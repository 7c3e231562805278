use chrono::{NaiveDate, NaiveDateTime};
use funnel_analytics_core::aggregation::{
    aggregate_qualification, aggregate_revenue, QualificationAggregate,
};
use funnel_analytics_core::metrics::general::calculate_general_metrics;
use funnel_analytics_core::metrics::qualification::calculate_qualification_metrics;
use funnel_analytics_core::metrics::revenue::calculate_revenue_metrics;
use funnel_analytics_core::metrics::{ratio, round_pct};
use funnel_analytics_core::period::{resolve_period, resolve_selection};
use funnel_analytics_core::records::qualification::{
    normalize_qualification, normalize_qualification_batch, QualificationEntry,
};
use funnel_analytics_core::records::revenue::RevenueRecord;
use funnel_analytics_core::validation::{validate_qualification_with, validate_revenue_record};
use funnel_analytics_core::{
    FixedClock, FunnelAnalyticsError, Period, PeriodPreset, PeriodSelection,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

// ===========================================================================
// Fixtures
// ===========================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn now() -> NaiveDateTime {
    date(2024, 5, 10).and_hms_opt(14, 30, 0).unwrap()
}

fn tiers(pairs: &[(&str, i64)]) -> BTreeMap<String, i64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn entry(day: u32, leads: i64) -> QualificationEntry {
    QualificationEntry {
        funnel_id: Some("webinar".to_string()),
        date: Some(date(2024, 5, day)),
        leads_total: Some(leads),
        responded_form: Some(if leads > 0 { 40 } else { 0 }),
        mql: if leads > 0 {
            tiers(&[("diamond", 10), ("gold", 5), ("silver", 0), ("bronze", 0)])
        } else {
            BTreeMap::new()
        },
        scheduled: if leads > 0 { tiers(&[("diamond", 8)]) } else { BTreeMap::new() },
        calls_done: if leads > 0 { tiers(&[("diamond", 6)]) } else { BTreeMap::new() },
        sales: if leads > 0 { tiers(&[("diamond", 2)]) } else { BTreeMap::new() },
        ..Default::default()
    }
}

// ===========================================================================
// Three-day scenario
// ===========================================================================

#[test]
fn test_three_day_scenario_uses_summed_totals() {
    let entries = vec![entry(1, 100), entry(2, 50), entry(3, 0)];
    let batch = normalize_qualification_batch(&entries, now());
    assert!(batch.rejected.is_empty());
    assert_eq!(batch.records.len(), 3);

    let period = Period::custom(date(2024, 5, 1), date(2024, 5, 3)).unwrap();
    let agg = aggregate_qualification(&batch.records, &period);

    assert_eq!(agg.total_leads, 150);
    assert_eq!(agg.total_mql, 30);
    assert_eq!(agg.total_calls, 12);
    assert_eq!(agg.total_sales, 4);

    let m = calculate_qualification_metrics(&agg);
    // 4 / 12 from totals, not the mean of daily rates
    assert_eq!(m.conversion_rate, round_pct(ratio(dec!(4), dec!(12))));
    assert_eq!(m.conversion_rate, dec!(33.33));

    let g = calculate_general_metrics(&agg);
    // 4 sales / 30 MQL
    assert_eq!(g.ascension_rate, dec!(13.33));
}

#[test]
fn test_tier_sum_consistency() {
    let entries = vec![entry(1, 100), entry(2, 50)];
    let batch = normalize_qualification_batch(&entries, now());
    let period = resolve_period(PeriodPreset::ThisMonth, now());
    let agg = aggregate_qualification(&batch.records, &period);

    let t = agg.total_mql_by_tier;
    assert_eq!(agg.total_mql, t.diamond + t.gold + t.silver + t.bronze);
    assert_eq!(agg.total_sales, agg.total_sales_by_tier.total());
}

#[test]
fn test_empty_set_identity() {
    let period = resolve_period(PeriodPreset::Last30Days, now());
    let agg = aggregate_qualification(&[], &period);
    assert_eq!(agg, QualificationAggregate::empty(period));

    let m = calculate_qualification_metrics(&agg);
    assert_eq!(m.form_response_rate, Decimal::ZERO);
    assert_eq!(m.scheduling_rate, Decimal::ZERO);
    assert_eq!(calculate_general_metrics(&agg).ascension_rate, Decimal::ZERO);
}

#[test]
fn test_period_boundaries() {
    let entries: Vec<_> = [4, 5, 9, 10].into_iter().map(|d| entry(d, 100)).collect();
    let batch = normalize_qualification_batch(&entries, now());
    let period = Period::custom(date(2024, 5, 5), date(2024, 5, 9)).unwrap();
    let agg = aggregate_qualification(&batch.records, &period);
    assert_eq!(agg.records_included, 2);
    assert_eq!(agg.total_leads, 200);
}

#[test]
fn test_aggregation_idempotent() {
    let batch = normalize_qualification_batch(&[entry(1, 100), entry(2, 50)], now());
    let period = resolve_period(PeriodPreset::ThisMonth, now());
    let first = aggregate_qualification(&batch.records, &period);
    let second = aggregate_qualification(&batch.records, &period);
    assert_eq!(first, second);

    // pre-scoped input gives the same answer
    let scoped: Vec<_> = batch
        .records
        .iter()
        .filter(|r| period.contains(r.date))
        .cloned()
        .collect();
    assert_eq!(aggregate_qualification(&scoped, &period), first);
}

// ===========================================================================
// Revenue
// ===========================================================================

#[test]
fn test_revenue_per_student_zero_students() {
    let records = vec![RevenueRecord {
        organization_id: Some("org".to_string()),
        date: date(2024, 5, 2),
        billing: dec!(5000),
        cash_in: dec!(1000),
        qualified_students: 0,
    }];
    let period = resolve_period(PeriodPreset::ThisMonth, now());
    let m = calculate_revenue_metrics(&aggregate_revenue(&records, &period));
    assert_eq!(m.billing, dec!(5000));
    assert_eq!(m.revenue_per_student, Decimal::ZERO);
}

// ===========================================================================
// Validation
// ===========================================================================

#[test]
fn test_validation_accumulates_errors() {
    let mut raw = entry(1, -5);
    raw.date = Some(date(2024, 5, 11));
    let result = validate_qualification_with(&raw, &FixedClock(now()));
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 2);
    let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["leads_total", "date"]);

    let errors = normalize_qualification(&raw, now()).unwrap_err();
    assert_eq!(errors, result.errors);
}

#[test]
fn test_today_is_not_future() {
    let raw = entry(10, 1);
    assert!(validate_qualification_with(&raw, &FixedClock(now())).valid);
}

#[test]
fn test_revenue_validation_negative_and_missing_date() {
    let raw = funnel_analytics_core::records::revenue::RevenueEntry {
        billing: Some(dec!(-1)),
        ..Default::default()
    };
    let result = validate_revenue_record(&raw, now());
    assert_eq!(result.errors.len(), 2);
}

// ===========================================================================
// Period resolution
// ===========================================================================

#[test]
fn test_presets_from_fixed_clock() {
    let p = resolve_period(PeriodPreset::Last7Days, now());
    assert_eq!((p.start_date, p.end_date), (date(2024, 5, 4), date(2024, 5, 10)));
    assert_eq!(p.days(), 7);

    let p = resolve_period(PeriodPreset::LastMonth, now());
    assert_eq!((p.start_date, p.end_date), (date(2024, 4, 1), date(2024, 4, 30)));
}

#[test]
fn test_custom_selection_from_json() {
    let json = r#"{"preset":"custom","start_date":"2024-05-01","end_date":"2024-05-03"}"#;
    let sel: PeriodSelection = serde_json::from_str(json).unwrap();
    let p = resolve_selection(&sel, now()).unwrap();
    assert_eq!(p.days(), 3);
    assert_eq!(p.preset, None);

    let inverted = PeriodSelection::Custom {
        start_date: date(2024, 5, 3),
        end_date: date(2024, 5, 1),
    };
    assert!(matches!(
        resolve_selection(&inverted, now()),
        Err(FunnelAnalyticsError::InvalidRange { .. })
    ));
}
