use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::timezone::Tz;
use arrow::array::{Array, ArrayRef, AsArray, PrimitiveArray};
use arrow::compute::cast;
use arrow::datatypes::{
    ArrowTimestampType, DataType, Date32Type, Float64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use arrow::error::ArrowError;
use arrow::util::display::array_value_to_string;
use chrono::{NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{DashboardError, Result};
use super::model::{Category, OrderDataset, OrderRecord};

/// Columns every input file must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    "order_id",
    "customer_id",
    "order_status",
    "order_purchase_timestamp",
    "order_approved_at",
    "order_delivered_carrier_date",
    "order_delivered_customer_date",
    "order_estimated_delivery_date",
    "payment_value",
    "product_category_name_english",
    "qty_order",
    "price",
    "freight_value",
    "review_score",
    "customer_state",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an order dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the columns in [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "order_id": "...", ... }, ...]`
/// * `.parquet` – string, numeric, date and timestamp columns
pub fn load_file(path: &Path) -> Result<OrderDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => {
            return Err(DashboardError::load(
                path,
                format!("unsupported file extension: .{other}"),
            ))
        }
    };

    let dataset = OrderDataset::from_records(records);
    log::info!(
        "Loaded {} order rows from {} (statuses: {:?})",
        dataset.len(),
        path.display(),
        dataset.statuses
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cells – format-independent view of one value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Cell {
    Text(String),
    Number(f64),
    Timestamp(NaiveDateTime),
    Null,
}

/// Text that reads as a missing value, as in a pandas export.
const NULL_TOKENS: [&str; 20] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "NaT", "nat",
];

impl Cell {
    fn from_text(s: &str) -> Cell {
        let trimmed = s.trim();
        if trimmed.is_empty() || NULL_TOKENS.contains(&trimmed) {
            Cell::Null
        } else {
            Cell::Text(s.to_string())
        }
    }
}

/// Builds an [`OrderRecord`] from cells looked up by column name.
struct RowReader<'a> {
    path: &'a Path,
    row: usize,
    cells: HashMap<&'static str, Cell>,
}

impl RowReader<'_> {
    fn take(&mut self, column: &'static str) -> Cell {
        self.cells.remove(column).unwrap_or(Cell::Null)
    }

    fn text(&mut self, column: &'static str) -> Option<String> {
        match self.take(column) {
            Cell::Text(s) => Some(s),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Timestamp(ts) => Some(ts.to_string()),
            Cell::Null => None,
        }
    }

    /// Non-finite values (`NaN`, `inf`) read as missing.
    fn number(&mut self, column: &'static str) -> Result<Option<f64>> {
        let value = match self.take(column) {
            Cell::Number(n) => n,
            Cell::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                DashboardError::load(
                    self.path,
                    format!("row {}: `{s}` in column `{column}` is not a number", self.row),
                )
            })?,
            Cell::Timestamp(_) => {
                return Err(DashboardError::load(
                    self.path,
                    format!(
                        "row {}: column `{column}` holds a timestamp, expected a number",
                        self.row
                    ),
                ))
            }
            Cell::Null => return Ok(None),
        };
        Ok(value.is_finite().then_some(value))
    }

    /// Whole numbers only; `2.0` is accepted, `1.5` is a load error.
    fn integer(&mut self, column: &'static str) -> Result<Option<i64>> {
        match self.number(column)? {
            Some(n) if n.fract() != 0.0 => Err(DashboardError::load(
                self.path,
                format!("row {}: `{n}` in column `{column}` is not a whole number", self.row),
            )),
            Some(n) => Ok(Some(n as i64)),
            None => Ok(None),
        }
    }

    /// A null name is still a category of its own.
    fn category(&mut self, column: &'static str) -> Option<Category> {
        if !self.cells.contains_key(column) {
            return None;
        }
        Some(self.text(column).map_or(Category::Unnamed, Category::Named))
    }

    fn timestamp(&mut self, column: &'static str) -> Result<Option<NaiveDateTime>> {
        match self.take(column) {
            Cell::Timestamp(ts) => Ok(Some(ts)),
            Cell::Null => Ok(None),
            Cell::Text(s) => parse_timestamp(&s).map(Some).ok_or(DashboardError::DateParse {
                row: self.row,
                column: column.to_string(),
                value: s,
            }),
            Cell::Number(n) => Err(DashboardError::DateParse {
                row: self.row,
                column: column.to_string(),
                value: n.to_string(),
            }),
        }
    }

    fn into_record(mut self) -> Result<OrderRecord> {
        Ok(OrderRecord {
            order_id: self.text("order_id"),
            customer_id: self.text("customer_id"),
            order_status: self.text("order_status"),
            purchase: self.timestamp("order_purchase_timestamp")?,
            approved: self.timestamp("order_approved_at")?,
            delivered_carrier: self.timestamp("order_delivered_carrier_date")?,
            delivered_customer: self.timestamp("order_delivered_customer_date")?,
            estimated_delivery: self.timestamp("order_estimated_delivery_date")?,
            payment_value: self.number("payment_value")?,
            product_category: self.category("product_category_name_english"),
            qty_order: self.integer("qty_order")?,
            price: self.number("price")?,
            freight_value: self.number("freight_value")?,
            review_score: self.number("review_score")?,
            customer_state: self.text("customer_state"),
        })
    }
}

/// Parse the ISO-like date-time forms found in exported order tables.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 5] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M:%S",
    ];
    let s = s.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Map each required column to its position, failing on the first absent one.
fn locate_columns<'h>(
    path: &Path,
    headers: impl IntoIterator<Item = &'h str>,
) -> Result<Vec<(&'static str, usize)>> {
    let positions: HashMap<&str, usize> = headers
        .into_iter()
        .enumerate()
        .map(|(i, h)| (h.trim(), i))
        .collect();

    REQUIRED_COLUMNS
        .iter()
        .map(|&col| {
            positions
                .get(col)
                .map(|&i| (col, i))
                .ok_or_else(|| {
                    DashboardError::load(path, format!("missing required column `{col}`"))
                })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one order-item line per row.
fn load_csv(path: &Path) -> Result<Vec<OrderRecord>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| DashboardError::load(path, e))?;
    let headers = reader
        .headers()
        .map_err(|e| DashboardError::load(path, format!("reading CSV headers: {e}")))?
        .clone();
    let columns = locate_columns(path, headers.iter())?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record =
            result.map_err(|e| DashboardError::load(path, format!("CSV row {row}: {e}")))?;

        let cells = columns
            .iter()
            .map(|&(col, idx)| (col, Cell::from_text(record.get(idx).unwrap_or(""))))
            .collect();
        records.push(RowReader { path, row, cells }.into_record()?);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "order_id": "e481f51c", "payment_value": 38.71, "order_status": "delivered", ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<OrderRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| DashboardError::load(path, e))?;
    let root: JsonValue = serde_json::from_str(&text)
        .map_err(|e| DashboardError::load(path, format!("parsing JSON: {e}")))?;

    let rows = root
        .as_array()
        .ok_or_else(|| DashboardError::load(path, "expected a top-level JSON array"))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = value
            .as_object()
            .ok_or_else(|| DashboardError::load(path, format!("row {row} is not a JSON object")))?;

        let mut cells = HashMap::new();
        for col in REQUIRED_COLUMNS {
            let cell = match obj.get(col) {
                None => {
                    return Err(DashboardError::load(
                        path,
                        format!("row {row}: missing required column `{col}`"),
                    ))
                }
                Some(JsonValue::Null) => Cell::Null,
                Some(JsonValue::String(s)) => Cell::from_text(s),
                Some(JsonValue::Number(n)) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
                Some(other) => Cell::Text(other.to_string()),
            };
            cells.insert(col, cell);
        }
        records.push(RowReader { path, row, cells }.into_record()?);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the order table.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); timestamps may be stored natively or as text.
/// Dictionary-encoded and narrow numeric columns are cast to a common type first.
fn load_parquet(path: &Path) -> Result<Vec<OrderRecord>> {
    let file = std::fs::File::open(path).map_err(|e| DashboardError::load(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DashboardError::load(path, format!("reading parquet metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| DashboardError::load(path, format!("building parquet reader: {e}")))?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| {
            DashboardError::load(path, format!("reading parquet record batch: {e}"))
        })?;
        let schema = batch.schema();
        let columns = locate_columns(path, schema.fields().iter().map(|f| f.name().as_str()))?
            .into_iter()
            .map(|(col, idx)| Ok((col, ArrowColumn::new(path, col, batch.column(idx))?)))
            .collect::<Result<Vec<_>>>()?;

        for i in 0..batch.num_rows() {
            let row = records.len() + 1;
            let cells = columns
                .iter()
                .map(|(col, column)| (*col, column.cell(i)))
                .collect();
            records.push(RowReader { path, row, cells }.into_record()?);
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

/// One batch column reduced to a handful of physical types.
struct ArrowColumn {
    array: ArrayRef,
    tz: Option<Tz>,
}

impl ArrowColumn {
    fn new(path: &Path, name: &str, array: &ArrayRef) -> Result<Self> {
        let array = normalize_column(array).map_err(|e| {
            DashboardError::load(path, format!("converting column `{name}`: {e}"))
        })?;
        let tz = match array.data_type() {
            DataType::Timestamp(_, Some(tz)) => Some(tz.parse::<Tz>().map_err(|e| {
                DashboardError::load(path, format!("column `{name}`: {e}"))
            })?),
            _ => None,
        };
        Ok(ArrowColumn { array, tz })
    }

    /// Extract a single cell at a given row.
    fn cell(&self, row: usize) -> Cell {
        let col = &self.array;
        if col.is_null(row) {
            return Cell::Null;
        }
        match col.data_type() {
            DataType::Utf8 => Cell::from_text(col.as_string::<i32>().value(row)),
            DataType::Float64 => col
                .as_primitive_opt::<Float64Type>()
                .map(|a| Cell::Number(a.value(row)))
                .unwrap_or(Cell::Null),
            DataType::Date32 => col
                .as_primitive_opt::<Date32Type>()
                .and_then(|a| a.value_as_datetime(row))
                .map(Cell::Timestamp)
                .unwrap_or(Cell::Null),
            DataType::Timestamp(unit, _) => {
                let local = match unit {
                    TimeUnit::Second => local_datetime::<TimestampSecondType>(col, row, self.tz),
                    TimeUnit::Millisecond => {
                        local_datetime::<TimestampMillisecondType>(col, row, self.tz)
                    }
                    TimeUnit::Microsecond => {
                        local_datetime::<TimestampMicrosecondType>(col, row, self.tz)
                    }
                    TimeUnit::Nanosecond => {
                        local_datetime::<TimestampNanosecondType>(col, row, self.tz)
                    }
                };
                local.map(Cell::Timestamp).unwrap_or(Cell::Null)
            }
            _ => array_value_to_string(col.as_ref(), row)
                .map(|s| Cell::from_text(&s))
                .unwrap_or(Cell::Null),
        }
    }
}

/// Cast a column to Utf8, Float64, Date32 or a timestamp where arrow can.
///
/// Anything else is left alone and later read through its display form.
fn normalize_column(col: &ArrayRef) -> std::result::Result<ArrayRef, ArrowError> {
    let target = match col.data_type() {
        DataType::Dictionary(_, value) => value.as_ref().clone(),
        DataType::LargeUtf8 | DataType::Utf8View | DataType::Boolean => DataType::Utf8,
        DataType::Date64 => DataType::Timestamp(TimeUnit::Millisecond, None),
        DataType::Float64 => return Ok(Arc::clone(col)),
        t if t.is_numeric() => DataType::Float64,
        _ => return Ok(Arc::clone(col)),
    };
    normalize_column(&cast(col, &target)?)
}

/// Wall-clock time of a timestamp: in its own zone when the column has one,
/// otherwise as stored.
fn local_datetime<T: ArrowTimestampType>(
    col: &ArrayRef,
    row: usize,
    tz: Option<Tz>,
) -> Option<NaiveDateTime> {
    let array: &PrimitiveArray<T> = col.as_primitive_opt::<T>()?;
    match tz {
        Some(tz) => array
            .value_as_datetime_with_tz(row, tz)
            .map(|dt| dt.naive_local()),
        None => array.value_as_datetime(row),
    }
}
