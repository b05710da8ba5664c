// src/ui/elements/popups/send_confirm_popup.rs
use bevy::prelude::*;
use bevy_egui::egui;

use crate::outreach::definitions::BatchMode;
use crate::outreach::events::RequestBatchRun;
use crate::ui::elements::state::{send_confirm_text, MailerWindowState};

pub fn show_send_confirm_popup(
    ctx: &egui::Context,
    state: &mut MailerWindowState,
    batch_writer: &mut EventWriter<RequestBatchRun>,
) {
    if !state.show_send_confirm_popup {
        return;
    }

    let mut popup_open = state.show_send_confirm_popup;
    let mut send_clicked = false;
    let mut cancel_clicked = false;

    egui::Window::new("Confirm Send")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut popup_open)
        .show(ctx, |ui| {
            ui.label(send_confirm_text(state.pending_send_rows.len()));
            ui.colored_label(egui::Color32::YELLOW, "Emails go out immediately.");
            ui.separator();
            ui.horizontal(|ui| {
                if ui
                    .add(egui::Button::new("SEND").fill(egui::Color32::DARK_GREEN))
                    .clicked()
                {
                    send_clicked = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel_clicked = true;
                }
            });
        });

    if send_clicked {
        batch_writer.write(RequestBatchRun {
            mode: BatchMode::Send,
            confirmed: Some(state.pending_send_rows.clone()),
        });
    }
    if send_clicked || cancel_clicked || !popup_open {
        state.show_send_confirm_popup = false;
        state.pending_send_rows.clear();
    }
}
