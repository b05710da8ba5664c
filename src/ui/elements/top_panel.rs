// src/ui/elements/top_panel.rs
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::egui;

use crate::outreach::definitions::BatchMode;
use crate::outreach::events::{
    RequestApplySettings, RequestBatchRun, RequestFetchRows, RequestInitiateCsvUpload,
    RequestPreview,
};
use crate::outreach::selection::RowSelection;
use crate::outreach::systems::upload::upload_refusal;
use crate::settings::AppSettings;
use crate::ui::elements::popups::open_settings_popup;
use crate::ui::elements::state::MailerWindowState;

/// Every request the window can raise.
#[derive(SystemParam)]
pub struct MailerEventWriters<'w> {
    pub fetch: EventWriter<'w, RequestFetchRows>,
    pub preview: EventWriter<'w, RequestPreview>,
    pub batch: EventWriter<'w, RequestBatchRun>,
    pub upload: EventWriter<'w, RequestInitiateCsvUpload>,
    pub settings: EventWriter<'w, RequestApplySettings>,
}

/// What the action button does for the current mode and settings.
/// A confirmation is tied to the exact rows it was shown for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Run(BatchMode),
    AskToConfirm(Vec<i64>),
}

pub fn action_outcome(mode: BatchMode, selection: &RowSelection, confirm_before_send: bool) -> ActionOutcome {
    match mode {
        BatchMode::Send if confirm_before_send => ActionOutcome::AskToConfirm(selection.selected_indices()),
        _ => ActionOutcome::Run(mode),
    }
}

pub struct TopPanelFlags {
    pub processing: bool,
    pub uploading: bool,
    pub loading: bool,
}

pub fn show_top_panel(
    ui: &mut egui::Ui,
    state: &mut MailerWindowState,
    selection: &RowSelection,
    settings: &AppSettings,
    flags: TopPanelFlags,
    writers: &mut MailerEventWriters,
) {
    let busy = flags.processing || flags.uploading;

    ui.horizontal(|ui| {
        ui.heading(state.heading());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("⚙ Settings").clicked() {
                open_settings_popup(state, settings);
            }
        });
    });

    ui.horizontal(|ui| {
        ui.add_enabled_ui(!flags.processing && !state.show_send_confirm_popup, |ui| {
            ui.selectable_value(&mut state.mode, BatchMode::Draft, "Draft");
            ui.selectable_value(&mut state.mode, BatchMode::Send, "Send");
        });
        ui.separator();

        let can_upload = upload_refusal(flags.uploading, flags.processing, flags.loading).is_none();
        if ui
            .add_enabled(can_upload, egui::Button::new("Upload CSV"))
            .on_hover_text("Replace the contact list with rows from a CSV file")
            .clicked()
        {
            writers.upload.write(RequestInitiateCsvUpload);
        }
        if ui
            .add_enabled(!busy && !flags.loading, egui::Button::new("Reload"))
            .clicked()
        {
            writers.fetch.write(RequestFetchRows);
        }
        ui.separator();

        let selected = selection.selected_count();
        ui.label(format!("{} selected", selected));

        let action_enabled = !flags.processing && !state.show_send_confirm_popup && selected > 0;
        let button = egui::Button::new(state.action_label(flags.processing));
        let button = match state.mode {
            BatchMode::Send if action_enabled => button.fill(egui::Color32::from_rgb(150, 40, 40)),
            _ => button,
        };
        if ui.add_enabled(action_enabled, button).clicked() {
            match action_outcome(state.mode, selection, settings.confirm_before_send) {
                ActionOutcome::Run(mode) => {
                    writers.batch.write(RequestBatchRun { mode, confirmed: None });
                }
                ActionOutcome::AskToConfirm(rows) => {
                    state.pending_send_rows = rows;
                    state.show_send_confirm_popup = true;
                }
            }
        }
        if flags.processing || flags.uploading {
            ui.spinner();
        }
    });
}
