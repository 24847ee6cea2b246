use eframe::egui::{self, Align, Color32, Key, Layout, RichText, Ui};

use titanic_dashboard::chat::Role;

use crate::state::AppState;

const USER_BUBBLE: Color32 = Color32::from_rgb(0xDC, 0xF8, 0xC6);
const BOT_BUBBLE: Color32 = Color32::from_rgb(0xF1, 0xF0, 0xF0);

/// Question box plus the conversation so far.
pub fn chat_panel(ui: &mut Ui, state: &mut AppState) {
    if state.chat_client.is_none() {
        ui.label("Set OPENROUTER_API_KEY to enable the assistant.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let input = ui.add(
            egui::TextEdit::singleline(&mut state.chat_input)
                .hint_text("Type your question here")
                .desired_width(ui.available_width() - 60.0),
        );
        let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        if (ui.button("Send").clicked() || submitted) && !state.chat_input.trim().is_empty() {
            state.send_chat();
        }
    });

    ui.add_space(6.0);

    for turn in state.transcript.turns() {
        let (who, fill, layout) = match turn.role {
            Role::User => ("You", USER_BUBBLE, Layout::right_to_left(Align::Min)),
            _ => ("Bot", BOT_BUBBLE, Layout::left_to_right(Align::Min)),
        };
        ui.with_layout(layout, |ui: &mut Ui| {
            egui::Frame::new()
                .fill(fill)
                .corner_radius(10.0)
                .inner_margin(10.0)
                .show(ui, |ui: &mut Ui| {
                    ui.set_max_width(ui.available_width() * 0.8);
                    ui.label(RichText::new(format!("{who}:")).strong().color(Color32::BLACK));
                    ui.label(RichText::new(&turn.content).color(Color32::BLACK));
                });
        });
        ui.add_space(4.0);
    }
}
