use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use titanic_dashboard::data::filter::filter_options;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Human-readable label for a filterable column.
fn filter_label(column: &str) -> &str {
    match column {
        "Sex" => "Gender",
        "Pclass" => "Passenger Class",
        other => other,
    }
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let options = match &state.table {
        Some(table) => filter_options(table),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    if options.is_empty() {
        ui.label("No filterable columns (Sex, Pclass) in this file.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (col, all_values) in &options {
                let n_selected = all_values
                    .iter()
                    .filter(|v| state.selection.is_selected(col, v))
                    .count();
                let n_total = all_values.len();
                let header_text = format!("{}  ({n_selected}/{n_total})", filter_label(col));

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(col);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(col);
                            }
                        });

                        for val in all_values {
                            let mut checked = state.selection.is_selected(col, val);
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                state.toggle_filter_value(col, val);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(table), Some(view)) = (&state.table, &state.view) {
            let name = state.source_name.as_deref().unwrap_or("dataset");
            ui.label(format!(
                "{name}: {} passengers loaded, {} visible",
                table.len(),
                view.len()
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
        .set_title("Open Titanic CSV")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.open_file(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
