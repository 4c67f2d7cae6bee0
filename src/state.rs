use std::path::PathBuf;

use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::data::filter::{filter_records, FilterSelection, StatusSelector};
use crate::data::model::{OrderDataset, OrderRecord};
use crate::data::pipeline::DashboardSnapshot;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<OrderDataset>,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Current filter input.
    pub selection: Option<FilterSelection>,

    /// Rows passing the current selection.
    pub filtered: Vec<OrderRecord>,

    /// Aggregates over `filtered`.
    pub snapshot: Option<DashboardSnapshot>,

    /// Status colours for the current dataset.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and show it with `selection`.
    pub fn set_dataset(
        &mut self,
        dataset: OrderDataset,
        source: PathBuf,
        selection: FilterSelection,
    ) {
        self.color_map = Some(ColorMap::new(&dataset.statuses));
        self.dataset = Some(dataset);
        self.source = Some(source);
        self.selection = Some(selection);
        self.status_message = None;
        self.refilter();
    }

    /// Rerun filter and aggregation from scratch for the current selection.
    pub fn refilter(&mut self) {
        let (Some(ds), Some(selection)) = (&self.dataset, &self.selection) else {
            return;
        };
        self.filtered = filter_records(&ds.records, selection);
        self.snapshot = Some(DashboardSnapshot::from_filtered(
            selection.clone(),
            &self.filtered,
        ));
    }

    /// Change the date range. Ignored before a dataset is loaded.
    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) {
        if let Some(selection) = &mut self.selection {
            if selection.start == start && selection.end == end {
                return;
            }
            selection.start = start;
            selection.end = end;
            self.refilter();
        }
    }

    /// Change the status selector. Ignored before a dataset is loaded.
    pub fn set_status(&mut self, status: StatusSelector) {
        if let Some(selection) = &mut self.selection {
            if selection.status == status {
                return;
            }
            selection.status = status;
            self.refilter();
        }
    }
}
