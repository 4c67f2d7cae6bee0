//! Stateless group-by transformations over a (filtered) order table.
//!
//! Every function tolerates empty input and returns an empty table for it.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;

use super::model::{
    Bucket, BucketSummary, Category, CategorySummary, OrderRecord, OrderStats, ScatterPoint,
    StateSummary, StatusCount,
};

/// Rows shown in each best/worst ranking.
pub const TOP_N: usize = 5;

// ---------------------------------------------------------------------------
// Headline figures
// ---------------------------------------------------------------------------

/// Distinct order count and total payment of the table.
pub fn order_stats(records: &[OrderRecord]) -> OrderStats {
    let orders: HashSet<&str> = records.iter().filter_map(|r| r.order_id.as_deref()).collect();
    OrderStats {
        distinct_orders: orders.len(),
        total_revenue: records.iter().filter_map(|r| r.payment_value).sum(),
    }
}

// ---------------------------------------------------------------------------
// Time buckets
// ---------------------------------------------------------------------------

/// Distinct orders and revenue per calendar bucket of the purchase date.
///
/// Empty buckets are omitted; output is ascending by bucket start.
pub fn time_buckets(records: &[OrderRecord], bucket: Bucket) -> Vec<BucketSummary> {
    let mut groups: BTreeMap<NaiveDate, (HashSet<&str>, f64)> = BTreeMap::new();

    for r in records {
        let Some(day) = r.purchase_date() else {
            continue;
        };
        let (orders, revenue) = groups.entry(bucket.start_of(day)).or_default();
        if let Some(id) = r.order_id.as_deref() {
            orders.insert(id);
        }
        *revenue += r.payment_value.unwrap_or(0.0);
    }

    groups
        .into_iter()
        .map(|(start, (orders, revenue))| BucketSummary {
            start,
            orders: orders.len(),
            revenue,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Summed `qty_order` per product category, named categories in name order
/// followed by the unnamed group.
///
/// A null category name is its own group; only rows with no category value
/// at all are left out.
pub fn category_quantities(records: &[OrderRecord]) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<&Category, i64> = BTreeMap::new();
    for r in records {
        if let Some(category) = &r.product_category {
            *groups.entry(category).or_default() += r.qty_order.unwrap_or(0);
        }
    }
    groups
        .into_iter()
        .map(|(category, quantity)| CategorySummary {
            category: category.clone(),
            quantity,
        })
        .collect()
}

/// The [`TOP_N`] categories with the highest quantity. Ties keep group order.
pub fn best_categories(summary: &[CategorySummary]) -> Vec<CategorySummary> {
    let mut ranked = summary.to_vec();
    ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    ranked.truncate(TOP_N);
    ranked
}

/// The [`TOP_N`] categories with the lowest quantity. Ties keep group order.
pub fn worst_categories(summary: &[CategorySummary]) -> Vec<CategorySummary> {
    let mut ranked = summary.to_vec();
    ranked.sort_by_key(|c| c.quantity);
    ranked.truncate(TOP_N);
    ranked
}

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// Revenue per customer state, ascending by revenue.
pub fn state_revenue(records: &[OrderRecord]) -> Vec<StateSummary> {
    let mut groups: BTreeMap<&str, f64> = BTreeMap::new();
    for r in records {
        if let Some(state) = r.customer_state.as_deref() {
            *groups.entry(state).or_default() += r.payment_value.unwrap_or(0.0);
        }
    }
    let mut out: Vec<StateSummary> = groups
        .into_iter()
        .map(|(state, revenue)| StateSummary {
            state: state.to_string(),
            revenue,
        })
        .collect();
    out.sort_by(|a, b| a.revenue.total_cmp(&b.revenue));
    out
}

// ---------------------------------------------------------------------------
// Status counts
// ---------------------------------------------------------------------------

/// Row count per order status, most frequent first (ties by first appearance).
pub fn status_counts(records: &[OrderRecord]) -> Vec<StatusCount> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<StatusCount> = Vec::new();

    for status in records.iter().filter_map(|r| r.order_status.as_deref()) {
        match position.get(status) {
            Some(&i) => out[i].count += 1,
            None => {
                position.insert(status, out.len());
                out.push(StatusCount {
                    status: status.to_string(),
                    count: 1,
                });
            }
        }
    }

    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

// ---------------------------------------------------------------------------
// Price / freight scatter
// ---------------------------------------------------------------------------

/// One point per row carrying both a price and a freight value.
pub fn price_freight_points(records: &[OrderRecord]) -> Vec<ScatterPoint> {
    records
        .iter()
        .filter_map(|r| {
            Some(ScatterPoint {
                price: r.price?,
                freight: r.freight_value?,
                review_score: r.review_score,
            })
        })
        .collect()
}
