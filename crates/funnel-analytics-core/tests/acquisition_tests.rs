use funnel_analytics_core::metrics::acquisition::{
    calculate_acquisition_metrics, AcquisitionMetricsInput,
};
use funnel_analytics_core::records::acquisition::{
    summarize_acquisition, AcquisitionInput, AcquisitionLedger, AcquisitionRecord, Month,
};
use funnel_analytics_core::FunnelAnalyticsError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn monthly(
    month: Month,
    leads: u64,
    qualified: u64,
    sales: u64,
    investment: Decimal,
) -> AcquisitionInput {
    AcquisitionInput {
        funnel_id: "launch".to_string(),
        month,
        year: 2024,
        total_leads: Some(leads),
        qualified_leads: Some(qualified),
        scheduled: Some(qualified / 2),
        calls_done: Some(qualified / 3),
        sales: Some(sales),
        investment: Some(investment),
    }
}

// ===========================================================================
// ROAS
// ===========================================================================

#[test]
fn test_roas_examples() {
    let m = calculate_acquisition_metrics(&AcquisitionMetricsInput {
        investment: dec!(1000),
        revenue: dec!(3200),
        ..Default::default()
    });
    assert_eq!(m.roas, dec!(3.2));
    assert_eq!(m.roi, dec!(220));

    let m = calculate_acquisition_metrics(&AcquisitionMetricsInput {
        investment: Decimal::ZERO,
        revenue: dec!(500),
        ..Default::default()
    });
    assert_eq!(m.roas, Decimal::ZERO);
    assert_eq!(m.roi, Decimal::ZERO);
}

// ===========================================================================
// Ledger
// ===========================================================================

#[test]
fn test_upsert_replaces_same_month() {
    let mut ledger = AcquisitionLedger::new();
    ledger.upsert(&monthly(Month::Jan, 100, 40, 4, dec!(1500))).unwrap();
    let updated = ledger
        .upsert(&monthly(Month::Jan, 200, 40, 8, dec!(1500)))
        .unwrap()
        .clone();

    assert_eq!(ledger.len(), 1);
    assert_eq!(updated.cost_per_lead, dec!(7.5));
    assert_eq!(updated.conversion_rate, dec!(20));
    assert_eq!(ledger.get("launch", Month::Jan, 2024), Some(&updated));
}

#[test]
fn test_summary_over_months() {
    let mut ledger = AcquisitionLedger::new();
    ledger.upsert(&monthly(Month::Feb, 100, 50, 5, dec!(1000))).unwrap();
    ledger.upsert(&monthly(Month::Jan, 300, 30, 9, dec!(2000))).unwrap();

    let months: Vec<Month> = ledger.for_funnel("launch").map(|r| r.month).collect();
    assert_eq!(months, vec![Month::Jan, Month::Feb]);

    let s = summarize_acquisition(ledger.iter());
    assert_eq!(s.months, 2);
    assert_eq!(s.total_leads, 400);
    assert_eq!(s.total_investment, dec!(3000));
    assert_eq!(s.avg_cost_per_lead, dec!(7.5));
    // mean of 30% and 10%, not 14 / 80
    assert_eq!(s.avg_conversion_rate, dec!(20));

    let metrics = calculate_acquisition_metrics(&s.metrics_input(dec!(9000)));
    assert_eq!(metrics.roas, dec!(3));
}

#[test]
fn test_stored_rates_are_not_recomputed() {
    let mut stored = AcquisitionRecord::derive(&monthly(Month::Mar, 10, 10, 1, dec!(100))).unwrap();
    // a historical record written under an older formula
    stored.conversion_rate = dec!(55);
    let ledger = AcquisitionLedger::from_stored(vec![stored]);
    let s = summarize_acquisition(ledger.iter());
    assert_eq!(s.avg_conversion_rate, dec!(55));
}

#[test]
fn test_derive_rejects_bad_input() {
    let mut input = monthly(Month::Apr, 10, 5, 1, dec!(-1));
    assert!(matches!(
        AcquisitionRecord::derive(&input),
        Err(FunnelAnalyticsError::InvalidInput { .. })
    ));
    input.investment = None;
    input.funnel_id = "  ".to_string();
    assert!(AcquisitionRecord::derive(&input).is_err());
}

#[test]
fn test_month_codes() {
    let m: Month = serde_json::from_str("\"fev\"").unwrap();
    assert_eq!(m, Month::Feb);
    assert_eq!("dez".parse::<Month>().unwrap(), Month::Dec);
    assert_eq!("10".parse::<Month>().unwrap(), Month::Oct);
    assert_eq!(Month::Sep.number(), 9);
}
