use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use order_insight::app::OrderInsightApp;
use order_insight::config::Args;
use order_insight::data::loader::load_file;
use order_insight::data::pipeline::DashboardSnapshot;
use order_insight::state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Startup load failures are fatal; later File → Open… failures are not.
    let dataset = load_file(&args.data)
        .with_context(|| format!("loading order data from {}", args.data.display()))?;
    let selection = args.selection_for(&dataset);

    if args.summary {
        let snapshot = DashboardSnapshot::compute(&dataset.records, &selection);
        let mut out = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, &snapshot).context("writing summary")?;
        writeln!(out).context("writing summary")?;
        return Ok(());
    }

    let mut state = AppState::default();
    state.set_dataset(dataset, args.data.clone(), selection);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Order Insight – Sales Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(OrderInsightApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
