mod common;

use anyhow::Result;
use chrono::NaiveDate;
use order_insight::data::aggregate::{order_stats, time_buckets};
use order_insight::data::filter::{filter_records, FilterSelection, StatusSelector};
use order_insight::data::loader::load_file;
use order_insight::data::model::Bucket;
use order_insight::data::pipeline::DashboardSnapshot;
use order_insight::state::AppState;
use order_insight::ui::panels::load_into;

use common::{write_csv, write_raw, EXAMPLE_ROWS};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn january_all_statuses() -> Result<()> {
    let (_dir, path) = write_csv(&EXAMPLE_ROWS);
    let dataset = load_file(&path)?;

    let selection = FilterSelection {
        start: day(2023, 1, 1),
        end: day(2023, 1, 31),
        status: StatusSelector::parse("ALL"),
    };
    let rows = filter_records(&dataset.records, &selection);
    let stats = order_stats(&rows);
    assert_eq!(stats.distinct_orders, 1);
    assert_eq!(stats.total_revenue, 150.0);
    Ok(())
}

#[test]
fn monthly_buckets_of_unfiltered_input() -> Result<()> {
    let (_dir, path) = write_csv(&EXAMPLE_ROWS);
    let dataset = load_file(&path)?;

    let buckets = time_buckets(&dataset.records, Bucket::Month);
    let summary: Vec<_> = buckets.iter().map(|b| (b.start, b.orders, b.revenue)).collect();
    assert_eq!(
        summary,
        vec![(day(2023, 1, 1), 1, 150.0), (day(2023, 2, 1), 1, 200.0)]
    );
    Ok(())
}

#[test]
fn absent_status_yields_empty_snapshot() -> Result<()> {
    let (_dir, path) = write_csv(&EXAMPLE_ROWS);
    let dataset = load_file(&path)?;

    let selection = FilterSelection {
        status: StatusSelector::parse("cancelled"),
        ..FilterSelection::full_range(&dataset)
    };
    let snap = DashboardSnapshot::compute(&dataset.records, &selection);
    assert!(snap.is_empty());
    assert!(snap.daily.is_empty());
    assert!(snap.rfm.is_empty());
    assert!(snap.scatter.is_empty());
    Ok(())
}

#[test]
fn snapshot_serializes_to_json() -> Result<()> {
    let (_dir, path) = write_csv(&EXAMPLE_ROWS);
    let dataset = load_file(&path)?;
    let snap = DashboardSnapshot::compute(&dataset.records, &FilterSelection::full_range(&dataset));

    let json = serde_json::to_value(&snap)?;
    assert_eq!(json["selection"]["status"], "ALL");
    assert_eq!(json["rows"], 3);
    assert_eq!(json["stats"]["distinct_orders"], 2);
    assert_eq!(json["monthly"][0]["start"], "2023-01-01");
    assert_eq!(json["state_revenue"][0]["state"], "SP");
    assert_eq!(json["best_categories"][0]["category"], "toys");
    assert_eq!(json["best_categories"][0]["quantity"], 4);
    assert_eq!(json["best_recency"][0]["numeric_id"], 2);
    Ok(())
}

#[test]
fn failed_reload_keeps_previous_dataset() -> Result<()> {
    let (_dir, good) = write_csv(&EXAMPLE_ROWS);
    let (_bad_dir, bad) = write_raw("broken.csv", "order_id\nA\n");

    let mut state = AppState::default();
    load_into(&mut state, &good)?;
    assert_eq!(state.filtered.len(), 3);

    let err = load_into(&mut state, &bad).unwrap_err();
    assert!(format!("{err:#}").contains("missing required column"));
    assert_eq!(state.dataset.as_ref().map(|d| d.len()), Some(3));
    Ok(())
}
