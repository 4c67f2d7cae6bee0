use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::data::filter::{FilterSelection, StatusSelector, ALL_STATUSES};
use crate::data::model::OrderDataset;

/// Interactive sales dashboard over an e-commerce order dataset.
#[derive(Parser, Debug, Clone)]
#[command(name = "order-insight", version, about)]
pub struct Args {
    /// Order dataset to open (.csv, .json or .parquet)
    #[arg(short, long, env = "ORDER_INSIGHT_DATA", default_value = "all_data.csv")]
    pub data: PathBuf,

    /// First purchase date to include (YYYY-MM-DD). Defaults to the earliest in the data
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last purchase date to include (YYYY-MM-DD). Defaults to the latest in the data
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Order status to show, or ALL
    #[arg(long, default_value = ALL_STATUSES)]
    pub status: String,

    /// Print the dashboard tables as JSON and exit instead of opening the window
    #[arg(long)]
    pub summary: bool,
}

impl Args {
    /// Initial filter for `dataset`: the full range, narrowed by any flags given.
    pub fn selection_for(&self, dataset: &OrderDataset) -> FilterSelection {
        let full = FilterSelection::full_range(dataset);
        FilterSelection {
            start: self.start.unwrap_or(full.start),
            end: self.end.unwrap_or(full.end),
            status: StatusSelector::parse(&self.status),
        }
    }
}
