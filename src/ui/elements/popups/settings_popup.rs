// src/ui/elements/popups/settings_popup.rs
use bevy::prelude::*;
use bevy_egui::egui;

use crate::gateway::client::normalize_base_url;
use crate::outreach::events::RequestApplySettings;
use crate::outreach::resources::GatewayHandle;
use crate::settings::AppSettings;
use crate::ui::elements::state::MailerWindowState;

/// Fills the popup inputs from the live settings before it opens.
pub fn open_settings_popup(state: &mut MailerWindowState, settings: &AppSettings) {
    state.settings_base_url_input = settings.api_base_url.clone();
    state.settings_confirm_before_send = settings.confirm_before_send;
    state.show_settings_popup = true;
}

pub fn show_settings_popup(
    ctx: &egui::Context,
    state: &mut MailerWindowState,
    gateway: &GatewayHandle,
    processing: bool,
    settings_writer: &mut EventWriter<RequestApplySettings>,
) {
    if !state.show_settings_popup {
        return;
    }

    let mut is_window_open = state.show_settings_popup;
    let mut close_requested = false;
    let input_check = normalize_base_url(&state.settings_base_url_input);

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut is_window_open)
        .show(ctx, |ui| {
            ui.heading("Backend");
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Current:");
                match gateway.api() {
                    Ok(_) => ui.label(gateway.base_url()),
                    Err(msg) => ui.colored_label(egui::Color32::LIGHT_RED, msg),
                };
            });

            ui.label("API base URL:");
            ui.add(
                egui::TextEdit::singleline(&mut state.settings_base_url_input)
                    .hint_text("http://localhost:8000")
                    .desired_width(f32::INFINITY),
            );
            if let Err(e) = &input_check {
                ui.colored_label(egui::Color32::LIGHT_RED, e.to_string());
            }

            ui.checkbox(
                &mut state.settings_confirm_before_send,
                "Ask for confirmation before sending",
            );
            ui.separator();

            ui.horizontal(|ui| {
                let can_save = input_check.is_ok() && !processing;
                if ui.add_enabled(can_save, egui::Button::new("Save")).clicked() {
                    settings_writer.write(RequestApplySettings {
                        settings: AppSettings {
                            api_base_url: state.settings_base_url_input.trim().to_string(),
                            confirm_before_send: state.settings_confirm_before_send,
                        },
                    });
                    info!("Settings submitted from popup.");
                    close_requested = true;
                }
                if ui.button("Close").clicked() {
                    close_requested = true;
                }
            });
        });

    if !is_window_open || close_requested {
        state.show_settings_popup = false;
    }
}
