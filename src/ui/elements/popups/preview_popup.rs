// src/ui/elements/popups/preview_popup.rs
use bevy_egui::egui;

use crate::ui::elements::state::MailerWindowState;

pub fn show_preview_popup(ctx: &egui::Context, state: &mut MailerWindowState) {
    let Some(display) = &state.preview else {
        return;
    };

    let mut is_window_open = true;
    let mut close_requested = false;

    egui::Window::new("Email Preview")
        .collapsible(false)
        .resizable(true)
        .default_width(560.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut is_window_open)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("SUBJECT").small().strong());
            ui.label(egui::RichText::new(&display.preview.subject).size(16.0));
            ui.separator();
            ui.label(egui::RichText::new("BODY").small().strong());
            egui::ScrollArea::vertical()
                .max_height(ctx.screen_rect().height() * 0.6)
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(&display.preview.body).monospace());
                });
            ui.separator();
            if ui.button("Close").clicked() {
                close_requested = true;
            }
        });

    if !is_window_open || close_requested {
        state.preview = None;
    }
}
