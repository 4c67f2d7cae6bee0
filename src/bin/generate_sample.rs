use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One output row, in the column order of an `all_data.csv` export.
#[derive(Serialize)]
struct Row {
    order_id: String,
    customer_id: String,
    order_status: &'static str,
    order_purchase_timestamp: String,
    order_approved_at: String,
    order_delivered_carrier_date: String,
    order_delivered_customer_date: String,
    order_estimated_delivery_date: String,
    payment_value: f64,
    product_category_name_english: &'static str,
    qty_order: u32,
    price: f64,
    freight_value: f64,
    review_score: u8,
    customer_state: &'static str,
}

const STATUSES: [&str; 6] = [
    "delivered",
    "shipped",
    "canceled",
    "invoiced",
    "processing",
    "unavailable",
];
const CATEGORIES: [&str; 8] = [
    "bed_bath_table",
    "health_beauty",
    "sports_leisure",
    "furniture_decor",
    "computers_accessories",
    "housewares",
    "watches_gifts",
    "telephony",
];
const STATES: [&str; 9] = ["SP", "RJ", "MG", "RS", "PR", "SC", "BA", "DF", "GO"];

fn fmt(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "all_data.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let epoch = NaiveDate::from_ymd_opt(2017, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("building start date")?;
    let customers: Vec<String> = (0..400).map(|i| format!("cust_{i:04x}")).collect();

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    let mut rows = 0usize;

    for order_no in 0..1500 {
        let purchase = epoch
            + Duration::days(rng.below(600) as i64)
            + Duration::seconds(rng.below(86_400) as i64);
        // Skew status towards delivered, like real marketplace data.
        let status = if rng.next_f64() < 0.9 {
            "delivered"
        } else {
            rng.pick(&STATUSES)
        };
        let delivered = status == "delivered";
        let customer = &customers[rng.below(customers.len())];
        let state = rng.pick(&STATES);
        let review = (rng.gauss(4.1, 1.2).round().clamp(1.0, 5.0)) as u8;
        let items = 1 + rng.below(3);

        for _ in 0..items {
            let category = rng.pick(&CATEGORIES);
            let qty = 1 + rng.below(2) as u32;
            let price = (rng.gauss(120.0, 60.0).abs() + 5.0).round();
            let freight = (rng.gauss(20.0, 8.0).abs() + 2.0).round();
            let carrier = purchase + Duration::days(2);

            writer
                .serialize(Row {
                    order_id: format!("ord_{order_no:05}"),
                    customer_id: customer.clone(),
                    order_status: status,
                    order_purchase_timestamp: fmt(purchase),
                    order_approved_at: fmt(purchase + Duration::hours(1)),
                    order_delivered_carrier_date: if delivered {
                        fmt(carrier)
                    } else {
                        String::new()
                    },
                    order_delivered_customer_date: if delivered {
                        fmt(carrier + Duration::days(3 + rng.below(10) as i64))
                    } else {
                        String::new()
                    },
                    order_estimated_delivery_date: fmt(purchase + Duration::days(20)),
                    payment_value: price * qty as f64 + freight,
                    product_category_name_english: category,
                    qty_order: qty,
                    price,
                    freight_value: freight,
                    review_score: review,
                    customer_state: state,
                })
                .with_context(|| format!("writing row {rows}"))?;
            rows += 1;
        }
    }

    writer.flush().context("flushing CSV")?;
    println!("Wrote {rows} order rows to {output_path}");
    Ok(())
}
