// src/ui/mod.rs
use bevy::prelude::*;
use bevy_egui::EguiContextPass;

pub mod elements;
pub mod systems;

use elements::main_window::outreach_window_ui;
use elements::state::MailerWindowState;
use systems::{handle_preview_results, handle_ui_feedback};

/// Text of the status line under the table.
#[derive(Resource, Default, Debug, Clone)]
pub struct UiFeedbackState {
    pub last_message: String,
    pub is_error: bool,
}

/// Plugin for the outreach window: table, toolbar, status line and popups.
pub struct OutreachUiPlugin;

impl Plugin for OutreachUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiFeedbackState>()
            .init_resource::<MailerWindowState>()
            .add_systems(Update, (handle_ui_feedback, handle_preview_results))
            .add_systems(EguiContextPass, outreach_window_ui);

        info!("OutreachUiPlugin initialized.");
    }
}
