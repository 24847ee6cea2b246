use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use titanic_dashboard::data::{CellValue, FilteredView};

const ROW_HEIGHT: f32 = 18.0;

/// Render the cleaned, filtered rows as a scrollable grid. The `#` column
/// is the row's position in the uploaded file.
pub fn data_table(ui: &mut Ui, view: &FilteredView) {
    if view.columns().is_empty() {
        ui.label("No columns to show.");
        return;
    }

    egui::ScrollArea::horizontal()
        .id_salt("data_table_hscroll")
        .show(ui, |ui: &mut Ui| {
            ui.push_id("data_table", |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .resizable(true)
                    .max_scroll_height(320.0)
                    .cell_layout(egui::Layout::right_to_left(egui::Align::Center))
                    .column(Column::auto().at_least(40.0))
                    .columns(Column::auto().at_least(60.0), view.columns().len())
                    .header(ROW_HEIGHT + 2.0, |mut header| {
                        header.col(|ui| {
                            ui.strong("#");
                        });
                        for col in view.columns() {
                            header.col(|ui| {
                                ui.strong(&col.name);
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(ROW_HEIGHT, view.len(), |mut row| {
                            let idx = row.index();
                            row.col(|ui| {
                                ui.label(view.indices[idx].to_string());
                            });
                            for col in view.columns() {
                                row.col(|ui| {
                                    ui.label(cell_text(&col.values[idx]));
                                });
                            }
                        });
                    });
            });
        });
}

/// Missing cells show as blank in the grid.
fn cell_text(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        other => other.to_string(),
    }
}
