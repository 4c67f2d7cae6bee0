use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by the data layer.
///
/// `DataLoad` and `DateParse` are fatal at startup. `EmptyResult` is never
/// returned by filters or aggregators; the UI builds it through
/// [`require_rows`] to show a "no data" placeholder.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to load {}: {reason}", path.display())]
    DataLoad { path: PathBuf, reason: String },

    #[error("row {row}: column `{column}` holds an unparsable date-time `{value}`")]
    DateParse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("no data for {0}")]
    EmptyResult(&'static str),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

impl DashboardError {
    pub(crate) fn load(path: &Path, reason: impl ToString) -> Self {
        DashboardError::DataLoad {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Fail with [`DashboardError::EmptyResult`] when a chart has nothing to draw.
pub fn require_rows<'a, T>(rows: &'a [T], what: &'static str) -> Result<&'a [T]> {
    if rows.is_empty() {
        Err(DashboardError::EmptyResult(what))
    } else {
        Ok(rows)
    }
}
