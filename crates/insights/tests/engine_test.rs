use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use cdr_analytics_core::{CdrRecord, CdrStore};
use cdr_analytics_data::MemoryCdrStore;
use cdr_analytics_insights::{InsightsEngine, InsightsError};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 8, d).unwrap()
}

fn record(reference: &str, caller: &str, recipient: &str, date: NaiveDate) -> CdrRecord {
    CdrRecord {
        reference: reference.to_string(),
        caller_id: caller.to_string(),
        recipient: recipient.to_string(),
        call_date: date,
        end_time: NaiveTime::from_hms_opt(14, 21, 33).unwrap(),
        duration: 60,
        cost: dec!(1),
        currency: "GBP".to_string(),
    }
}

async fn engine_with(records: Vec<CdrRecord>) -> InsightsEngine {
    let store = Arc::new(MemoryCdrStore::new());
    store.append_batch(records).await.unwrap();
    InsightsEngine::new(store)
}

fn empty_engine() -> InsightsEngine {
    InsightsEngine::new(Arc::new(MemoryCdrStore::new()))
}

#[tokio::test]
async fn average_cost_is_exact_decimal_mean() {
    let mut records = Vec::new();
    for (i, cost) in [dec!(1), dec!(3), dec!(5)].iter().enumerate() {
        let mut r = record(&format!("R{i}"), "A", "X", day(16));
        r.cost = *cost;
        records.push(r);
    }
    let engine = engine_with(records).await;

    assert_eq!(engine.average_cost().await.unwrap(), dec!(3));
}

#[tokio::test]
async fn average_cost_keeps_decimal_precision() {
    let mut records = Vec::new();
    for (i, cost) in [dec!(0.1), dec!(0.2)].iter().enumerate() {
        let mut r = record(&format!("R{i}"), "A", "X", day(16));
        r.cost = *cost;
        records.push(r);
    }
    let engine = engine_with(records).await;

    // 0.3 / 2 = 0.15 exactly, no float rounding
    assert_eq!(engine.average_cost().await.unwrap(), dec!(0.15));
}

#[tokio::test]
async fn average_cost_on_empty_store_is_an_error() {
    let engine = empty_engine();
    assert!(matches!(
        engine.average_cost().await,
        Err(InsightsError::EmptyDataset)
    ));
}

#[tokio::test]
async fn max_cost_call_picks_greatest_cost() {
    let mut r1 = record("R1", "A", "X", day(16));
    r1.cost = dec!(2);
    let mut r2 = record("R2", "B", "Y", day(16));
    r2.cost = dec!(7);
    let mut r3 = record("R3", "C", "Z", day(16));
    r3.cost = dec!(5);
    let engine = engine_with(vec![r1, r2, r3]).await;

    let max = engine.max_cost_call().await.unwrap().unwrap();
    assert_eq!(max.reference, "R2");
}

#[tokio::test]
async fn max_cost_call_tie_keeps_first_in_snapshot_order() {
    let mut r1 = record("R1", "A", "X", day(16));
    r1.cost = dec!(5);
    let mut r2 = record("R2", "B", "Y", day(16));
    r2.cost = dec!(5);
    // appended out of order; the snapshot sorts by reference
    let engine = engine_with(vec![r2, r1]).await;

    let max = engine.max_cost_call().await.unwrap().unwrap();
    assert_eq!(max.reference, "R1");
}

#[tokio::test]
async fn max_cost_call_on_empty_store_is_none() {
    let engine = empty_engine();
    assert!(engine.max_cost_call().await.unwrap().is_none());
}

#[tokio::test]
async fn longest_call_picks_greatest_duration() {
    let mut r1 = record("R1", "A", "X", day(16));
    r1.duration = 10;
    let mut r2 = record("R2", "B", "Y", day(16));
    r2.duration = 30;
    let mut r3 = record("R3", "C", "Z", day(16));
    r3.duration = 20;
    let engine = engine_with(vec![r1, r2, r3]).await;

    let longest = engine.longest_call().await.unwrap().unwrap();
    assert_eq!(longest.reference, "R2");
}

#[tokio::test]
async fn longest_call_on_empty_store_is_none() {
    let engine = empty_engine();
    assert!(engine.longest_call().await.unwrap().is_none());
}

#[tokio::test]
async fn average_calls_per_day_over_two_days() {
    // day 16: 2 calls, day 17: 4 calls => 6 / 2 = 3.0
    let mut records = Vec::new();
    for i in 0..2 {
        records.push(record(&format!("A{i}"), "A", "X", day(16)));
    }
    for i in 0..4 {
        records.push(record(&format!("B{i}"), "B", "Y", day(17)));
    }
    let engine = engine_with(records).await;

    let avg = engine.average_calls_per_day().await.unwrap();
    assert!((avg - 3.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn average_calls_per_day_single_day() {
    let records = (0..3)
        .map(|i| record(&format!("R{i}"), "A", "X", day(16)))
        .collect();
    let engine = engine_with(records).await;

    let avg = engine.average_calls_per_day().await.unwrap();
    assert!((avg - 3.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn average_calls_per_day_on_empty_store_is_zero() {
    let engine = empty_engine();
    assert_eq!(engine.average_calls_per_day().await.unwrap(), 0.0);
}

#[tokio::test]
async fn total_cost_by_currency_groups_and_sums() {
    let mut r1 = record("R1", "A", "X", day(16));
    r1.cost = dec!(1);
    let mut r2 = record("R2", "B", "Y", day(16));
    r2.cost = dec!(2);
    r2.currency = "USD".to_string();
    let mut r3 = record("R3", "C", "Z", day(16));
    r3.cost = dec!(3);
    let engine = engine_with(vec![r1, r2, r3]).await;

    let totals = engine.total_cost_by_currency().await.unwrap();
    assert_eq!(totals.len(), 2);
    // sorted by currency code
    assert_eq!(totals[0].currency, "GBP");
    assert_eq!(totals[0].total_cost, dec!(4));
    assert_eq!(totals[1].currency, "USD");
    assert_eq!(totals[1].total_cost, dec!(2));
}

#[tokio::test]
async fn total_cost_by_currency_partitions_the_whole_set() {
    let mut records = Vec::new();
    for (i, (currency, cost)) in [("GBP", dec!(0.044)), ("USD", dec!(1.5)), ("GBP", dec!(2))]
        .iter()
        .enumerate()
    {
        let mut r = record(&format!("R{i}"), "A", "X", day(16));
        r.currency = (*currency).to_string();
        r.cost = *cost;
        records.push(r);
    }
    let engine = engine_with(records).await;

    let totals = engine.total_cost_by_currency().await.unwrap();
    let grand_total: Decimal = totals.iter().map(|t| t.total_cost).sum();
    assert_eq!(grand_total, dec!(3.544));
}

#[tokio::test]
async fn total_cost_by_currency_on_empty_store_is_empty() {
    let engine = empty_engine();
    assert!(engine.total_cost_by_currency().await.unwrap().is_empty());
}

#[tokio::test]
async fn top_callers_ranks_descending_and_truncates() {
    // A: 3 calls, B: 1, C: 2 => top 2 = [(A, 3), (C, 2)]
    let mut records = Vec::new();
    for i in 0..3 {
        records.push(record(&format!("A{i}"), "A", "X", day(16)));
    }
    records.push(record("B0", "B", "Y", day(16)));
    for i in 0..2 {
        records.push(record(&format!("C{i}"), "C", "Z", day(16)));
    }
    let engine = engine_with(records).await;

    let top = engine.top_callers(2).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].caller_id, "A");
    assert_eq!(top[0].call_count, 3);
    assert_eq!(top[1].caller_id, "C");
    assert_eq!(top[1].call_count, 2);
}

#[tokio::test]
async fn top_callers_ties_break_by_caller_id() {
    let records = vec![
        record("R1", "B", "X", day(16)),
        record("R2", "A", "X", day(16)),
    ];
    let engine = engine_with(records).await;

    let top = engine.top_callers(5).await.unwrap();
    assert_eq!(top[0].caller_id, "A");
    assert_eq!(top[1].caller_id, "B");
}

#[tokio::test]
async fn top_callers_excludes_blank_callers() {
    let records = vec![
        record("R1", "", "X", day(16)),
        record("R2", "", "X", day(16)),
        record("R3", "A", "X", day(16)),
    ];
    let engine = engine_with(records).await;

    let top = engine.top_callers(5).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].caller_id, "A");
}

#[tokio::test]
async fn top_callers_with_non_positive_n_is_empty() {
    let engine = engine_with(vec![record("R1", "A", "X", day(16))]).await;

    assert!(engine.top_callers(0).await.unwrap().is_empty());
    assert!(engine.top_callers(-5).await.unwrap().is_empty());
}

#[tokio::test]
async fn top_callers_with_n_beyond_distinct_callers_returns_all() {
    let records = vec![
        record("R1", "A", "X", day(16)),
        record("R2", "B", "Y", day(16)),
    ];
    let engine = engine_with(records).await;

    assert_eq!(engine.top_callers(100).await.unwrap().len(), 2);
}

#[tokio::test]
async fn daily_summary_totals_per_day_ascending() {
    let mut r1 = record("R1", "A", "X", day(16));
    r1.duration = 10;
    r1.cost = dec!(1);
    let mut r2 = record("R2", "B", "Y", day(16));
    r2.duration = 20;
    r2.cost = dec!(2);
    let mut r3 = record("R3", "C", "Z", day(17));
    r3.duration = 30;
    r3.cost = dec!(3);
    let engine = engine_with(vec![r3, r1, r2]).await;

    let summary = engine.daily_summary().await.unwrap();
    assert_eq!(summary.len(), 2);

    assert_eq!(summary[0].date, day(16));
    assert_eq!(summary[0].total_calls, 2);
    assert_eq!(summary[0].total_duration, 30);
    assert_eq!(summary[0].total_cost, dec!(3));

    assert_eq!(summary[1].date, day(17));
    assert_eq!(summary[1].total_calls, 1);
    assert_eq!(summary[1].total_duration, 30);
    assert_eq!(summary[1].total_cost, dec!(3));
}

#[tokio::test]
async fn daily_summary_on_empty_store_is_empty() {
    let engine = empty_engine();
    assert!(engine.daily_summary().await.unwrap().is_empty());
}

#[tokio::test]
async fn call_count_in_range_is_inclusive_on_both_ends() {
    let records = vec![
        record("R1", "A", "X", day(15)),
        record("R2", "B", "Y", day(16)),
        record("R3", "C", "Z", day(17)),
        record("R4", "D", "W", day(18)),
    ];
    let engine = engine_with(records).await;

    assert_eq!(engine.call_count_in_range(day(16), day(17)).await.unwrap(), 2);
    assert_eq!(engine.call_count_in_range(day(15), day(18)).await.unwrap(), 4);
}

#[tokio::test]
async fn call_count_in_range_start_equals_end() {
    let records = vec![
        record("R1", "A", "X", day(16)),
        record("R2", "B", "Y", day(16)),
        record("R3", "C", "Z", day(17)),
    ];
    let engine = engine_with(records).await;

    assert_eq!(engine.call_count_in_range(day(16), day(16)).await.unwrap(), 2);
}

#[tokio::test]
async fn call_count_in_range_start_after_end_is_zero() {
    let engine = engine_with(vec![record("R1", "A", "X", day(16))]).await;

    assert_eq!(engine.call_count_in_range(day(17), day(16)).await.unwrap(), 0);
}

#[tokio::test]
async fn total_duration_by_recipient_sums_exact_matches() {
    let mut r1 = record("R1", "A", "X", day(16));
    r1.duration = 10;
    let mut r2 = record("R2", "B", "X", day(16));
    r2.duration = 15;
    let mut r3 = record("R3", "C", "Y", day(16));
    r3.duration = 20;
    let engine = engine_with(vec![r1, r2, r3]).await;

    assert_eq!(engine.total_duration_by_recipient("X").await.unwrap(), 25);
}

#[tokio::test]
async fn total_duration_by_unmatched_recipient_is_zero() {
    let engine = engine_with(vec![record("R1", "A", "X", day(16))]).await;

    assert_eq!(
        engine.total_duration_by_recipient("NON_EXISTENT").await.unwrap(),
        0
    );
}

#[tokio::test]
async fn operations_are_idempotent_across_calls() {
    let records = vec![
        record("R1", "A", "X", day(16)),
        record("R2", "B", "Y", day(17)),
    ];
    let engine = engine_with(records).await;

    let first = engine.daily_summary().await.unwrap();
    let second = engine.daily_summary().await.unwrap();
    assert_eq!(first, second);
}
