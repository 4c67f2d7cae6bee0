use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

pub const HEADER: &str = concat!(
    "order_id,customer_id,order_status,order_purchase_timestamp,order_approved_at,",
    "order_delivered_carrier_date,order_delivered_customer_date,order_estimated_delivery_date,",
    "payment_value,product_category_name_english,qty_order,price,freight_value,review_score,",
    "customer_state",
);

/// The three-row example dataset: two items of order A in January, order B in February.
pub const EXAMPLE_ROWS: [&str; 3] = [
    concat!(
        "A,X,delivered,2023-01-01 10:00:00,2023-01-01 10:15:00,2023-01-02 09:00:00,",
        "2023-01-05 14:00:00,2023-01-20 00:00:00,100.0,toys,1,90.0,10.0,5,SP",
    ),
    concat!(
        "A,X,delivered,2023-01-01 10:00:00,2023-01-01 10:15:00,2023-01-02 09:00:00,",
        "2023-01-05 14:00:00,2023-01-20 00:00:00,50.0,audio,2,20.0,10.0,5,SP",
    ),
    concat!(
        "B,Y,shipped,2023-02-01 09:30:00,2023-02-01 10:00:00,2023-02-02 08:00:00,,",
        "2023-02-25 00:00:00,200.0,toys,3,60.0,20.0,,RJ",
    ),
];

/// Write `rows` under `HEADER` to a CSV file in a fresh temp dir.
pub fn write_csv(rows: &[&str]) -> (TempDir, PathBuf) {
    write_raw("orders.csv", &csv_text(HEADER, rows))
}

pub fn csv_text(header: &str, rows: &[&str]) -> String {
    let mut text = format!("{header}\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

pub fn write_raw(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    (dir, path)
}
