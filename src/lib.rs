//! Sales dashboard over an e-commerce order table: load, filter by purchase
//! date and order status, aggregate, and render with egui.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
