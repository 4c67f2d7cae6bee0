use chrono::NaiveDate;

use super::loader::parse_timestamp;
use super::model::OrderRecord;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn order(
    order_id: &str,
    customer: &str,
    status: &str,
    purchase: &str,
    payment: f64,
) -> OrderRecord {
    let purchase = parse_timestamp(purchase).unwrap();
    OrderRecord {
        order_id: Some(order_id.to_string()),
        customer_id: Some(customer.to_string()),
        order_status: Some(status.to_string()),
        purchase: Some(purchase),
        approved: Some(purchase),
        delivered_carrier: None,
        delivered_customer: None,
        estimated_delivery: None,
        payment_value: Some(payment),
        product_category: None,
        qty_order: Some(1),
        price: None,
        freight_value: None,
        review_score: None,
        customer_state: None,
    }
}
