use std::collections::HashSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

// ---------------------------------------------------------------------------
// OrderRecord – one row of the source table
// ---------------------------------------------------------------------------

/// One order-item line. `order_id` repeats across the items of an order.
///
/// Empty cells in the source load as `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub order_id: Option<String>,
    pub customer_id: Option<String>,
    pub order_status: Option<String>,
    pub purchase: Option<NaiveDateTime>,
    pub approved: Option<NaiveDateTime>,
    pub delivered_carrier: Option<NaiveDateTime>,
    pub delivered_customer: Option<NaiveDateTime>,
    pub estimated_delivery: Option<NaiveDateTime>,
    pub payment_value: Option<f64>,
    /// `None` when the row carries no category value at all; a present but
    /// null name is [`Category::Unnamed`].
    pub product_category: Option<Category>,
    pub qty_order: Option<i64>,
    pub price: Option<f64>,
    pub freight_value: Option<f64>,
    pub review_score: Option<f64>,
    pub customer_state: Option<String>,
}

/// Product category key. Null names form their own group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "Option<String>")]
pub enum Category {
    Named(String),
    Unnamed,
}

impl Category {
    pub fn named(name: impl Into<String>) -> Self {
        Category::Named(name.into())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Named(name) => f.write_str(name),
            Category::Unnamed => f.write_str("(none)"),
        }
    }
}

impl From<Category> for Option<String> {
    fn from(category: Category) -> Self {
        match category {
            Category::Named(name) => Some(name),
            Category::Unnamed => None,
        }
    }
}

impl OrderRecord {
    /// Calendar day of the purchase timestamp.
    pub fn purchase_date(&self) -> Option<NaiveDate> {
        self.purchase.map(|ts| ts.date())
    }
}

// ---------------------------------------------------------------------------
// OrderDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset plus the values the filter controls are seeded from.
#[derive(Debug, Clone, Default)]
pub struct OrderDataset {
    /// All rows in file order.
    pub records: Vec<OrderRecord>,
    /// Distinct `order_status` values in order of first appearance.
    pub statuses: Vec<String>,
    /// Earliest purchase date, if any row has one.
    pub first_purchase: Option<NaiveDate>,
    /// Latest purchase date, if any row has one.
    pub last_purchase: Option<NaiveDate>,
}

impl OrderDataset {
    /// Build the status list and date bounds from the loaded rows.
    pub fn from_records(records: Vec<OrderRecord>) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut statuses = Vec::new();
        for status in records.iter().filter_map(|r| r.order_status.as_deref()) {
            if seen.insert(status) {
                statuses.push(status.to_string());
            }
        }

        let dates = records.iter().filter_map(OrderRecord::purchase_date);
        let first_purchase = dates.clone().min();
        let last_purchase = dates.max();

        OrderDataset {
            records,
            statuses,
            first_purchase,
            last_purchase,
        }
    }

    /// Options for the status selector: `"ALL"` followed by every distinct status.
    pub fn status_options(&self) -> Vec<String> {
        std::iter::once(super::filter::ALL_STATUSES.to_string())
            .chain(self.statuses.iter().cloned())
            .collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Derived tables
// ---------------------------------------------------------------------------

/// Calendar granularity for time-bucketed totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Day,
    Month,
}

impl Bucket {
    /// First day of the bucket containing `date`.
    pub fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            Bucket::Day => date,
            Bucket::Month => date.with_day0(0).unwrap_or(date),
        }
    }

    /// Axis label for a bucket start.
    pub fn label(self, start: NaiveDate) -> String {
        match self {
            Bucket::Day => start.format("%Y-%m-%d").to_string(),
            Bucket::Month => start.format("%Y-%m").to_string(),
        }
    }
}

/// Orders and revenue within one calendar bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSummary {
    pub start: NaiveDate,
    pub orders: usize,
    pub revenue: f64,
}

/// Summed quantity for one product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub quantity: i64,
}

/// Recency / frequency / monetary metrics for one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmRecord {
    pub customer_id: String,
    /// Display label only, assigned 1.. in order of first appearance.
    pub numeric_id: usize,
    /// Whole days since the latest purchase in the input. `None` when the
    /// customer has no purchase timestamp.
    pub recency: Option<i64>,
    pub frequency: usize,
    pub monetary: f64,
}

/// Revenue for one customer state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSummary {
    pub state: String,
    pub revenue: f64,
}

/// Row count for one order status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// Headline figures for the filtered table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OrderStats {
    pub distinct_orders: usize,
    pub total_revenue: f64,
}

/// One point of the price / freight scatter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub price: f64,
    pub freight: f64,
    pub review_score: Option<f64>,
}
