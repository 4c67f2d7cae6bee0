use serde::Serialize;

use super::aggregate::{
    best_categories, category_quantities, order_stats, price_freight_points, state_revenue,
    status_counts, time_buckets, worst_categories,
};
use super::filter::{filter_records, FilterSelection};
use super::model::{
    Bucket, BucketSummary, CategorySummary, OrderRecord, OrderStats, RfmRecord, ScatterPoint,
    StateSummary, StatusCount,
};
use super::rfm::{best_by_frequency, best_by_monetary, best_by_recency, rfm_table};

/// Everything the dashboard renders for one filter selection.
///
/// Built from scratch on every selection change; nothing is carried over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub selection: FilterSelection,
    /// Rows that passed the filter.
    pub rows: usize,
    pub stats: OrderStats,
    pub monthly: Vec<BucketSummary>,
    pub daily: Vec<BucketSummary>,
    pub best_categories: Vec<CategorySummary>,
    pub worst_categories: Vec<CategorySummary>,
    pub rfm: Vec<RfmRecord>,
    pub best_recency: Vec<RfmRecord>,
    pub best_frequency: Vec<RfmRecord>,
    pub best_monetary: Vec<RfmRecord>,
    pub status_counts: Vec<StatusCount>,
    pub state_revenue: Vec<StateSummary>,
    pub scatter: Vec<ScatterPoint>,
}

impl DashboardSnapshot {
    /// Run every aggregator over an already filtered table.
    pub fn from_filtered(selection: FilterSelection, rows: &[OrderRecord]) -> Self {
        let categories = category_quantities(rows);
        let rfm = rfm_table(rows);
        DashboardSnapshot {
            rows: rows.len(),
            stats: order_stats(rows),
            monthly: time_buckets(rows, Bucket::Month),
            daily: time_buckets(rows, Bucket::Day),
            best_categories: best_categories(&categories),
            worst_categories: worst_categories(&categories),
            best_recency: best_by_recency(&rfm),
            best_frequency: best_by_frequency(&rfm),
            best_monetary: best_by_monetary(&rfm),
            rfm,
            status_counts: status_counts(rows),
            state_revenue: state_revenue(rows),
            scatter: price_freight_points(rows),
            selection,
        }
    }

    /// Filter the full table and run every aggregator over the result.
    pub fn compute(records: &[OrderRecord], selection: &FilterSelection) -> Self {
        let rows = filter_records(records, selection);
        if rows.is_empty() {
            log::warn!(
                "No rows between {} and {} with status {}",
                selection.start,
                selection.end,
                selection.status
            );
        }
        Self::from_filtered(selection.clone(), &rows)
    }

    /// Whether the selection matched no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::StatusSelector;
    use crate::data::test_support::{date, order};

    fn rows() -> Vec<OrderRecord> {
        vec![
            order("A", "X", "delivered", "2023-01-01 10:00:00", 100.0),
            order("A", "X", "delivered", "2023-01-01 10:00:00", 50.0),
            order("B", "Y", "shipped", "2023-02-01 09:00:00", 200.0),
        ]
    }

    #[test]
    fn january_selection_matches_example() {
        let selection = FilterSelection {
            start: date("2023-01-01"),
            end: date("2023-01-31"),
            status: StatusSelector::All,
        };
        let snap = DashboardSnapshot::compute(&rows(), &selection);
        assert_eq!(snap.stats.distinct_orders, 1);
        assert_eq!(snap.stats.total_revenue, 150.0);
        assert_eq!(snap.monthly.len(), 1);
        assert_eq!(snap.rfm.len(), 1);
        assert_eq!(snap.rfm[0].frequency, 2);
        assert!(!snap.is_empty());
    }

    #[test]
    fn missing_status_degrades_to_empty_snapshot() {
        let selection = FilterSelection {
            start: date("2023-01-01"),
            end: date("2023-12-31"),
            status: StatusSelector::parse("cancelled"),
        };
        let snap = DashboardSnapshot::compute(&rows(), &selection);
        assert!(snap.is_empty());
        assert!(snap.monthly.is_empty());
        assert!(snap.best_categories.is_empty());
        assert!(snap.best_recency.is_empty());
        assert!(snap.state_revenue.is_empty());
    }

    #[test]
    fn rows_without_ids_or_status_still_count() {
        let mut anonymous = order("A", "X", "delivered", "2023-01-01 10:00:00", 5.0);
        anonymous.order_id = None;
        anonymous.order_status = None;
        let selection = FilterSelection {
            start: date("2023-01-01"),
            end: date("2023-01-31"),
            status: StatusSelector::All,
        };

        let snap = DashboardSnapshot::compute(&[anonymous], &selection);
        assert_eq!(snap.rows, 1);
        assert_eq!(snap.stats.distinct_orders, 0);
        assert!(snap.status_counts.is_empty());
        assert!(!snap.is_empty());
    }
}
