use eframe::egui::{RichText, ScrollArea, Ui};

use titanic_dashboard::data::summarize;

use crate::state::AppState;
use crate::ui::{charts, chat, table};

// ---------------------------------------------------------------------------
// Central panel: metrics, charts, table and chat
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(loaded) = &state.table else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a Titanic CSV to view the dashboard  (File → Open CSV…)");
        });
        return;
    };
    let columns = loaded.column_names();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Titanic Interactive Dashboard");
            ui.label(format!("Columns detected in uploaded CSV: {columns:?}"));
            ui.add_space(8.0);

            metrics_row(ui, state);
            ui.separator();

            ui.heading("Visual Insights");
            charts::visual_insights(ui, state);
            ui.separator();

            ui.heading("Cleaned Dataset");
            if let Some(view) = &state.view {
                table::data_table(ui, view);
            }
            ui.separator();

            ui.heading("Titanic AI Chatbot");
            chat::chat_panel(ui, state);
        });
}

/// Total / survived / not-survived, recomputed from the current view.
fn metrics_row(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        return;
    };
    let metrics = summarize(view);

    ui.columns(3, |cols| {
        metric(&mut cols[0], "Total Passengers", metrics.total.to_string());
        metric(&mut cols[1], "Survived", metrics.survived.to_string());
        metric(&mut cols[2], "Not Survived", metrics.not_survived.to_string());
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).size(28.0).strong());
    });
}
