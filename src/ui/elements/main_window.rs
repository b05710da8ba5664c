// src/ui/elements/main_window.rs
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::outreach::events::RequestPreview;
use crate::outreach::resources::{BatchBackgroundState, ContactRegistry, GatewayHandle, UploadState};
use crate::settings::AppSettings;
use crate::ui::elements::contact_table::{apply_table_actions, contact_table};
use crate::ui::elements::popups::{
    show_alert_popup, show_preview_popup, show_send_confirm_popup, show_settings_popup,
};
use crate::ui::elements::state::MailerWindowState;
use crate::ui::elements::top_panel::{show_top_panel, MailerEventWriters, TopPanelFlags};
use crate::ui::UiFeedbackState;

#[allow(clippy::too_many_arguments)]
pub fn outreach_window_ui(
    mut contexts: EguiContexts,
    mut state: ResMut<MailerWindowState>,
    mut registry: ResMut<ContactRegistry>,
    bg_state: Res<BatchBackgroundState>,
    upload_state: Res<UploadState>,
    settings: Res<AppSettings>,
    gateway: Res<GatewayHandle>,
    ui_feedback: Res<UiFeedbackState>,
    mut writers: MailerEventWriters,
) {
    let ctx = contexts.ctx_mut();
    let processing = bg_state.is_processing();

    show_send_confirm_popup(ctx, &mut state, &mut writers.batch);
    show_settings_popup(ctx, &mut state, &gateway, processing, &mut writers.settings);
    show_preview_popup(ctx, &mut state);
    show_alert_popup(ctx, &mut state);

    egui::TopBottomPanel::top("outreach_top_panel").show(ctx, |ui| {
        ui.add_space(4.0);
        show_top_panel(
            ui,
            &mut state,
            &registry.selection,
            &settings,
            TopPanelFlags {
                processing,
                uploading: upload_state.uploading,
                loading: registry.loading,
            },
            &mut writers,
        );
        ui.add_space(4.0);
    });

    egui::TopBottomPanel::bottom("outreach_status_line").show(ctx, |ui| {
        if ui_feedback.last_message.is_empty() {
            ui.label(format!("{} row(s)", registry.rows().len()));
        } else {
            let color = if ui_feedback.is_error {
                egui::Color32::LIGHT_RED
            } else {
                ui.style().visuals.text_color()
            };
            ui.colored_label(color, &ui_feedback.last_message);
        }
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        if registry.loading && !registry.loaded_once {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        }
        if registry.rows().is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No rows loaded. Reload or upload a CSV.");
            });
            return;
        }

        let actions = contact_table(ui, &registry.selection);
        let locked = state.selection_locked(processing);
        let previews = apply_table_actions(&mut registry.selection, &actions, locked);
        for row_index in previews {
            writers.preview.write(RequestPreview { row_index });
        }
    });
}
