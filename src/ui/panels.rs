use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::{FilterSelection, StatusSelector};
use crate::data::loader::load_file;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let (Some(dataset), Some(selection)) = (&state.dataset, &state.selection) else {
        ui.label("No dataset loaded.");
        return;
    };

    // Copy what we need so we can mutate state after the widgets.
    let options = dataset.status_options();
    let mut start = selection.start;
    let mut end = selection.end;
    let mut status = selection.status.to_string();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Purchase date range ----
            ui.strong("Purchase date");
            egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
                ui.label("From");
                ui.add(DatePickerButton::new(&mut start).id_salt("start_date"));
                ui.end_row();
                ui.label("To");
                ui.add(DatePickerButton::new(&mut end).id_salt("end_date"));
                ui.end_row();
            });
            if start > end {
                ui.label(
                    RichText::new("Start is after end: nothing matches.").color(Color32::YELLOW),
                );
            }
            ui.separator();

            // ---- Order status ----
            ui.strong("Order status");
            for option in &options {
                let mut text = RichText::new(option);
                if let Some(cm) = &state.color_map {
                    if StatusSelector::parse(option) != StatusSelector::All {
                        text = text.color(cm.color_for(option));
                    }
                }
                ui.radio_value(&mut status, option.clone(), text);
            }
        });

    // Recompute the dashboard only when something actually changed.
    state.set_range(start, end);
    state.set_status(StatusSelector::parse(&status));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let source = state
                .source
                .as_deref()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{source}: {} rows loaded, {} visible",
                ds.len(),
                state.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open order data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = load_into(state, &path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

/// Replace the current dataset with the one at `path`, showing all of it.
///
/// On failure the previous dataset stays active.
pub fn load_into(state: &mut AppState, path: &Path) -> Result<()> {
    let dataset = load_file(path).with_context(|| format!("opening {}", path.display()))?;
    let selection = FilterSelection::full_range(&dataset);
    state.set_dataset(dataset, path.to_path_buf(), selection);
    Ok(())
}
