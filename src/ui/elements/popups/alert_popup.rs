// src/ui/elements/popups/alert_popup.rs
use bevy_egui::egui;

use crate::ui::elements::state::MailerWindowState;

/// Modal-style alert for whole-operation failures that don't belong on the
/// status line (e.g. a failed preview).
pub fn show_alert_popup(ctx: &egui::Context, state: &mut MailerWindowState) {
    let Some(message) = &state.alert_message else {
        return;
    };

    let mut dismissed = false;
    egui::Window::new("Alert")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.colored_label(egui::Color32::LIGHT_RED, message);
            ui.separator();
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        state.alert_message = None;
    }
}
