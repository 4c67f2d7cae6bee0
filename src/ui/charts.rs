use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{review_color, ColorMap, HIGHLIGHT, NEUTRAL};
use crate::data::error::require_rows;
use crate::data::model::{
    Bucket, BucketSummary, CategorySummary, OrderRecord, OrderStats, RfmRecord, ScatterPoint,
    StateSummary, StatusCount,
};
use crate::data::pipeline::DashboardSnapshot;
use crate::state::AppState;

/// Days from 0001-01-01 (CE) to 1970-01-01.
const UNIX_EPOCH_CE_DAYS: i32 = 719_163;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render every chart for the current snapshot in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(snap) = &state.snapshot else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open an order dataset to begin  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(format!("Orders with status: {}", snap.selection.status));
            metrics(ui, &snap.stats);
            ui.separator();

            categories(ui, snap);
            ui.separator();

            ui.strong("Monthly Sales");
            time_series(ui, "monthly_orders", Bucket::Month, &snap.monthly);
            ui.strong("Daily Sales");
            time_series(ui, "daily_orders", Bucket::Day, &snap.daily);
            ui.separator();

            rfm(ui, snap);
            ui.separator();

            ui.strong("Orders by Status");
            statuses(ui, &snap.status_counts, state.color_map.as_ref());
            ui.separator();

            ui.strong("Revenue by State");
            states(ui, &snap.state_revenue);
            ui.separator();

            ui.strong("Price, Freight and Review Score");
            scatter(ui, &snap.scatter);
            ui.separator();

            ui.strong("Order Data");
            order_table(ui, &state.filtered);
        });
}

fn placeholder(ui: &mut Ui, message: String) {
    ui.label(RichText::new(message).italics().color(Color32::GRAY));
}

fn money(v: f64) -> String {
    format!("R$ {v:.2}")
}

fn metrics(ui: &mut Ui, stats: &OrderStats) {
    ui.columns(2, |cols| {
        cols[0].label("Total Orders");
        cols[0].heading(stats.distinct_orders.to_string());
        cols[1].label("Total Revenue");
        cols[1].heading(money(stats.total_revenue));
    });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Label of the bar at `value`, blank between bars.
fn bar_label(labels: &[String], value: f64) -> String {
    let i = value.round();
    if (value - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

/// Bars placed at 0, 1, 2… with their labels on the category axis.
/// Horizontal charts draw the first entry at the bottom.
fn labelled_bars(
    ui: &mut Ui,
    id: &str,
    entries: Vec<(String, f64, Color32)>,
    horizontal: bool,
    height: f32,
) {
    let labels: Vec<String> = entries.iter().map(|(label, _, _)| label.clone()).collect();
    let bars: Vec<Bar> = entries
        .into_iter()
        .enumerate()
        .map(|(i, (label, value, color))| {
            Bar::new(i as f64, value).name(label).fill(color).width(0.7)
        })
        .collect();

    let mut chart = BarChart::new(bars);
    if horizontal {
        chart = chart.horizontal();
    }

    let formatter =
        move |mark: GridMark, _range: &RangeInclusive<f64>| bar_label(&labels, mark.value);
    let plot = Plot::new(id)
        .height(height)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false);
    let plot = if horizontal {
        plot.y_axis_formatter(formatter)
    } else {
        plot.x_axis_formatter(formatter)
    };

    plot.show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Highlight the first entry of a ranking, grey out the rest.
fn ranked(entries: impl Iterator<Item = (String, f64)>) -> Vec<(String, f64, Color32)> {
    entries
        .enumerate()
        .map(|(i, (label, value))| (label, value, if i == 0 { HIGHLIGHT } else { NEUTRAL }))
        .collect()
}

fn category_bars(ui: &mut Ui, id: &str, title: &str, rows: &[CategorySummary]) {
    ui.label(title);
    match require_rows(rows, "product categories") {
        Ok(rows) => {
            let mut entries =
                ranked(rows.iter().map(|c| (c.category.to_string(), c.quantity as f64)));
            // First-ranked bar on top.
            entries.reverse();
            labelled_bars(ui, id, entries, true, 180.0);
        }
        Err(e) => placeholder(ui, e.to_string()),
    }
}

fn categories(ui: &mut Ui, snap: &DashboardSnapshot) {
    ui.strong("Best and Worst Selling Product Categories by Quantity");
    category_bars(ui, "best_categories", "Top 5 best", &snap.best_categories);
    category_bars(ui, "worst_categories", "Top 5 worst", &snap.worst_categories);
}

fn rfm_bars(
    ui: &mut Ui,
    id: &str,
    title: &str,
    rows: &[RfmRecord],
    value: impl Fn(&RfmRecord) -> Option<f64>,
) {
    ui.label(title);
    match require_rows(rows, "customers") {
        Ok(rows) => {
            let entries = rows
                .iter()
                .filter_map(|r| Some((r.numeric_id.to_string(), value(r)?, HIGHLIGHT)))
                .collect();
            labelled_bars(ui, id, entries, false, 200.0);
        }
        Err(e) => placeholder(ui, e.to_string()),
    }
}

fn rfm(ui: &mut Ui, snap: &DashboardSnapshot) {
    ui.strong("Best Customers Based on RFM Parameters");
    ui.columns(3, |cols| {
        rfm_bars(&mut cols[0], "rfm_recency", "Last Purchase (days)", &snap.best_recency, |r| {
            r.recency.map(|d| d as f64)
        });
        rfm_bars(&mut cols[1], "rfm_frequency", "Purchase Frequency", &snap.best_frequency, |r| {
            Some(r.frequency as f64)
        });
        rfm_bars(&mut cols[2], "rfm_monetary", "Total Spent", &snap.best_monetary, |r| {
            Some(r.monetary)
        });
    });
}

fn statuses(ui: &mut Ui, rows: &[StatusCount], colors: Option<&ColorMap>) {
    match require_rows(rows, "order statuses") {
        Ok(rows) => {
            let entries = rows
                .iter()
                .map(|s| {
                    let color = colors.map(|cm| cm.color_for(&s.status)).unwrap_or(HIGHLIGHT);
                    (s.status.clone(), s.count as f64, color)
                })
                .collect();
            labelled_bars(ui, "status_counts", entries, false, 240.0);
        }
        Err(e) => placeholder(ui, e.to_string()),
    }
}

fn states(ui: &mut Ui, rows: &[StateSummary]) {
    match require_rows(rows, "customer states") {
        Ok(rows) => {
            let entries = rows
                .iter()
                .map(|s| (s.state.clone(), s.revenue, HIGHLIGHT))
                .collect();
            let height = (rows.len() as f32 * 18.0).max(120.0);
            labelled_bars(ui, "state_revenue", entries, true, height);
        }
        Err(e) => placeholder(ui, e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

fn epoch_days(date: NaiveDate) -> f64 {
    (date.num_days_from_ce() - UNIX_EPOCH_CE_DAYS) as f64
}

fn date_from_epoch_days(v: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(UNIX_EPOCH_CE_DAYS.saturating_add(v.round() as i32))
}

fn time_series(ui: &mut Ui, id: &str, bucket: Bucket, rows: &[BucketSummary]) {
    let rows = match require_rows(rows, "the selected period") {
        Ok(rows) => rows,
        Err(e) => return placeholder(ui, e.to_string()),
    };

    let points: Vec<[f64; 2]> = rows
        .iter()
        .map(|b| [epoch_days(b.start), b.orders as f64])
        .collect();

    Plot::new(id)
        .height(220.0)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Number of Orders")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            date_from_epoch_days(mark.value)
                .map(|d| bucket.label(d))
                .unwrap_or_default()
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("Orders")
                    .color(HIGHLIGHT)
                    .width(2.0),
            );
            plot_ui.points(Points::new(PlotPoints::from(points)).radius(2.5).color(HIGHLIGHT));
        });
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

fn scatter(ui: &mut Ui, points: &[ScatterPoint]) {
    let points = match require_rows(points, "price and freight") {
        Ok(points) => points,
        Err(e) => return placeholder(ui, e.to_string()),
    };

    // One series per whole review score so the legend doubles as a colour bar.
    let mut series: BTreeMap<Option<i64>, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        series
            .entry(p.review_score.map(|s| s.round() as i64))
            .or_default()
            .push([p.price, p.freight]);
    }

    Plot::new("price_freight")
        .height(320.0)
        .legend(Legend::default())
        .x_axis_label("Product Price (R$)")
        .y_axis_label("Freight (R$)")
        .show(ui, |plot_ui| {
            for (score, xy) in series {
                let name = match score {
                    Some(s) => format!("review {s}"),
                    None => "no review".to_string(),
                };
                plot_ui.points(
                    Points::new(PlotPoints::from(xy))
                        .name(name)
                        .color(review_color(score.map(|s| s as f64)).gamma_multiply(0.6))
                        .radius(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Order table
// ---------------------------------------------------------------------------

const TABLE_HEADERS: [&str; 11] = [
    "order_id",
    "customer_id",
    "status",
    "purchased",
    "payment",
    "category",
    "qty",
    "price",
    "freight",
    "review",
    "state",
];

fn opt<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn order_table(ui: &mut Ui, rows: &[OrderRecord]) {
    if let Err(e) = require_rows(rows, "the order table") {
        return placeholder(ui, e.to_string());
    }

    ui.push_id("order_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto(), TABLE_HEADERS.len() - 1)
            .column(Column::remainder())
            .min_scrolled_height(0.0)
            .max_scroll_height(400.0)
            .header(20.0, |mut header| {
                for name in TABLE_HEADERS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, rows.len(), |mut row| {
                    let r = &rows[row.index()];
                    let cells = [
                        opt(&r.order_id),
                        opt(&r.customer_id),
                        opt(&r.order_status),
                        r.purchase
                            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                            .unwrap_or_default(),
                        r.payment_value.map(money).unwrap_or_default(),
                        opt(&r.product_category),
                        opt(&r.qty_order),
                        r.price.map(money).unwrap_or_default(),
                        r.freight_value.map(money).unwrap_or_default(),
                        opt(&r.review_score),
                        opt(&r.customer_state),
                    ];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}
