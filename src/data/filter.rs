use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::model::{OrderDataset, OrderRecord};

/// Selector value meaning "do not filter on status".
pub const ALL_STATUSES: &str = "ALL";

// ---------------------------------------------------------------------------
// Filter predicate: date range plus optional status
// ---------------------------------------------------------------------------

/// Which order status passes the filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum StatusSelector {
    #[default]
    All,
    Only(String),
}

impl StatusSelector {
    /// Parse a selector label; the `"ALL"` sentinel selects every status.
    pub fn parse(label: &str) -> Self {
        if label == ALL_STATUSES {
            StatusSelector::All
        } else {
            StatusSelector::Only(label.to_string())
        }
    }

    fn accepts(&self, status: Option<&str>) -> bool {
        match self {
            StatusSelector::All => true,
            StatusSelector::Only(wanted) => status == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for StatusSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusSelector::All => f.write_str(ALL_STATUSES),
            StatusSelector::Only(s) => f.write_str(s),
        }
    }
}

impl From<StatusSelector> for String {
    fn from(selector: StatusSelector) -> Self {
        selector.to_string()
    }
}

/// User filter input: inclusive purchase-date range and status selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: StatusSelector,
}

impl FilterSelection {
    /// Selection covering the whole dataset: every purchase date, every status.
    ///
    /// Falls back to `NaiveDate::MIN..=NaiveDate::MAX` when no row has a purchase date.
    pub fn full_range(dataset: &OrderDataset) -> Self {
        FilterSelection {
            start: dataset.first_purchase.unwrap_or(NaiveDate::MIN),
            end: dataset.last_purchase.unwrap_or(NaiveDate::MAX),
            status: StatusSelector::All,
        }
    }

    /// Whether a single row passes the date range and status.
    ///
    /// Rows without a purchase timestamp never pass. An inverted range
    /// (`start > end`) passes nothing.
    pub fn matches(&self, record: &OrderRecord) -> bool {
        let Some(day) = record.purchase_date() else {
            return false;
        };
        self.start <= day && day <= self.end && self.status.accepts(record.order_status.as_deref())
    }
}

/// Return indices of rows that pass the selection.
pub fn filtered_indices(records: &[OrderRecord], selection: &FilterSelection) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| selection.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// Return a freshly allocated table holding the rows that pass the selection.
pub fn filter_records(records: &[OrderRecord], selection: &FilterSelection) -> Vec<OrderRecord> {
    let filtered: Vec<OrderRecord> = records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect();
    log::debug!(
        "Filter {}..={} status={} kept {}/{} rows",
        selection.start,
        selection.end,
        selection.status,
        filtered.len(),
        records.len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{date, order};

    fn sample() -> Vec<OrderRecord> {
        vec![
            order("A", "X", "delivered", "2023-01-01 08:00:00", 100.0),
            order("A", "X", "delivered", "2023-01-01 08:00:00", 50.0),
            order("B", "Y", "shipped", "2023-02-01 12:30:00", 200.0),
            order("C", "Z", "delivered", "2023-01-31 23:59:59", 10.0),
        ]
    }

    fn selection(start: &str, end: &str, status: &str) -> FilterSelection {
        FilterSelection {
            start: date(start),
            end: date(end),
            status: StatusSelector::parse(status),
        }
    }

    #[test]
    fn range_is_inclusive_at_day_granularity() {
        let rows = filter_records(&sample(), &selection("2023-01-01", "2023-01-31", "ALL"));
        let ids: Vec<_> = rows.iter().map(|r| r.order_id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["A", "A", "C"]);
    }

    #[test]
    fn inverted_range_is_empty_not_an_error() {
        let rows = filter_records(&sample(), &selection("2023-03-01", "2023-01-01", "ALL"));
        assert!(rows.is_empty());
    }

    #[test]
    fn unknown_status_is_empty_not_an_error() {
        let rows = filter_records(&sample(), &selection("2023-01-01", "2023-12-31", "cancelled"));
        assert!(rows.is_empty());
    }

    #[test]
    fn concrete_status_matches_exactly() {
        let sel = selection("2023-01-01", "2023-12-31", "shipped");
        let rows = filter_records(&sample(), &sel);
        assert_eq!(rows.len(), 1);
        assert!(rows
            .iter()
            .all(|r| r.order_status.as_deref() == Some("shipped")));
        let shipped_upper = selection("2023-01-01", "2023-12-31", "Shipped");
        assert!(filter_records(&sample(), &shipped_upper).is_empty());
    }

    #[test]
    fn filtering_is_idempotent_and_pure() {
        let input = sample();
        let sel = selection("2023-01-01", "2023-01-31", "delivered");
        let once = filter_records(&input, &sel);
        let twice = filter_records(&once, &sel);
        assert_eq!(once, twice);
        assert_eq!(input, sample());
    }

    #[test]
    fn rows_without_purchase_date_never_pass() {
        let mut rows = sample();
        rows[2].purchase = None;
        let sel = FilterSelection {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
            status: StatusSelector::All,
        };
        assert_eq!(filtered_indices(&rows, &sel), vec![0, 1, 3]);
    }

    #[test]
    fn full_range_covers_dataset() {
        let dataset = OrderDataset::from_records(sample());
        let sel = FilterSelection::full_range(&dataset);
        assert_eq!(sel.start, date("2023-01-01"));
        assert_eq!(sel.end, date("2023-02-01"));
        assert_eq!(filtered_indices(&dataset.records, &sel).len(), 4);
    }

    #[test]
    fn selector_round_trips_through_label() {
        assert_eq!(StatusSelector::parse("ALL"), StatusSelector::All);
        assert_eq!(StatusSelector::parse("delivered").to_string(), "delivered");
    }
}
