use eframe::egui;

use crate::state::AppState;
use crate::ui::{dashboard, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TitanicDashboardApp {
    pub state: AppState,
}

impl TitanicDashboardApp {
    pub fn new() -> Self {
        Self {
            state: AppState::from_env(),
        }
    }
}

impl eframe::App for TitanicDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, table, chat ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard::central_panel(ui, &mut self.state);
        });
    }
}
