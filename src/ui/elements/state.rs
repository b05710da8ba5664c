// src/ui/elements/state.rs
use bevy::prelude::Resource;

use crate::outreach::definitions::{BatchMode, EmailPreview};

/// Preview currently on screen, tagged with the row it was rendered for.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewDisplay {
    pub row_index: i64,
    pub preview: EmailPreview,
}

/// Window-level UI state; nothing here is shared with the outreach systems.
#[derive(Resource, Debug, Default)]
pub struct MailerWindowState {
    pub mode: BatchMode,

    pub preview: Option<PreviewDisplay>,
    /// Blocking alert; the rest of the window stays visible behind it.
    pub alert_message: Option<String>,

    pub show_send_confirm_popup: bool,
    /// Row indices the open confirmation was shown for.
    pub pending_send_rows: Vec<i64>,

    pub show_settings_popup: bool,
    pub settings_base_url_input: String,
    pub settings_confirm_before_send: bool,
}

impl MailerWindowState {
    pub fn heading(&self) -> &'static str {
        match self.mode {
            BatchMode::Draft => "Email Draft Mode",
            BatchMode::Send => "Email Send Mode",
        }
    }

    /// Selection edits are frozen while a run is active or a send awaits confirmation.
    pub fn selection_locked(&self, processing: bool) -> bool {
        processing || self.show_send_confirm_popup
    }

    pub fn action_label(&self, processing: bool) -> &'static str {
        match (processing, self.mode) {
            (true, _) => "Processing...",
            (false, BatchMode::Draft) => "Save as Drafts",
            (false, BatchMode::Send) => "Send Selected",
        }
    }
}

pub fn send_confirm_text(count: usize) -> String {
    format!(
        "Are you sure you want to SEND {} emails directly? This cannot be undone.",
        count
    )
}
