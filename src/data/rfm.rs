use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDateTime;

use super::aggregate::TOP_N;
use super::model::{OrderRecord, RfmRecord};

/// Per-customer recency / frequency / monetary metrics.
///
/// Customers appear in order of first appearance and get `numeric_id` 1.. in
/// that same order. Recency is measured against the latest purchase in
/// `records`, not in the full dataset.
pub fn rfm_table(records: &[OrderRecord]) -> Vec<RfmRecord> {
    let now = records.iter().filter_map(|r| r.purchase).max();

    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut latest: Vec<Option<NaiveDateTime>> = Vec::new();
    let mut out: Vec<RfmRecord> = Vec::new();

    for r in records {
        let Some(customer) = r.customer_id.as_deref() else {
            continue;
        };
        let i = *position.entry(customer).or_insert_with(|| {
            out.push(RfmRecord {
                customer_id: customer.to_string(),
                numeric_id: out.len() + 1,
                recency: None,
                frequency: 0,
                monetary: 0.0,
            });
            latest.push(None);
            out.len() - 1
        });

        let entry = &mut out[i];
        entry.frequency += 1;
        entry.monetary += r.payment_value.unwrap_or(0.0);
        latest[i] = latest[i].max(r.purchase);
    }

    for (entry, last) in out.iter_mut().zip(latest) {
        entry.recency = match (now, last) {
            (Some(now), Some(last)) => Some((now - last).num_days()),
            _ => None,
        };
    }
    out
}

/// Most recent customers first; customers without a purchase date last.
pub fn best_by_recency(table: &[RfmRecord]) -> Vec<RfmRecord> {
    top_n(table, |a, b| match (a.recency, b.recency) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

/// Customers with the most order rows first.
pub fn best_by_frequency(table: &[RfmRecord]) -> Vec<RfmRecord> {
    top_n(table, |a, b| b.frequency.cmp(&a.frequency))
}

/// Customers with the highest total spend first.
pub fn best_by_monetary(table: &[RfmRecord]) -> Vec<RfmRecord> {
    top_n(table, |a, b| b.monetary.total_cmp(&a.monetary))
}

fn top_n(
    table: &[RfmRecord],
    cmp: impl FnMut(&RfmRecord, &RfmRecord) -> Ordering,
) -> Vec<RfmRecord> {
    let mut ranked = table.to_vec();
    ranked.sort_by(cmp);
    ranked.truncate(TOP_N);
    ranked
}
