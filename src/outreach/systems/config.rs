// src/outreach/systems/config.rs
use bevy::prelude::*;

use crate::outreach::events::{OutreachFeedback, RequestApplySettings, RequestFetchRows};
use crate::outreach::resources::{BatchBackgroundState, GatewayHandle, UploadState};
use crate::settings::{io::save_settings, AppSettings};

/// Why stored settings were replaced by defaults at startup.
#[derive(Resource, Debug, Default, Clone)]
pub struct SettingsLoadError(pub Option<String>);

/// Startup: surfaces a settings load failure once logging and the window exist.
pub fn report_settings_load_error(
    load_error: Res<SettingsLoadError>,
    mut feedback_writer: EventWriter<OutreachFeedback>,
) {
    if let Some(message) = &load_error.0 {
        error!("{}", message);
        feedback_writer.write(OutreachFeedback::error(message.clone()));
    }
}

pub const SETTINGS_BUSY_MESSAGE: &str = "Settings can't change while a batch or upload is running";

/// Stores new settings, points the gateway at the new base URL and reloads
/// rows from it. Refused while a batch run or an upload is in progress.
pub fn handle_apply_settings(
    mut events: EventReader<RequestApplySettings>,
    mut settings: ResMut<AppSettings>,
    mut gateway: ResMut<GatewayHandle>,
    bg_state: Res<BatchBackgroundState>,
    upload_state: Res<UploadState>,
    mut fetch_writer: EventWriter<RequestFetchRows>,
    mut feedback_writer: EventWriter<OutreachFeedback>,
) {
    let Some(event) = events.read().last() else {
        return;
    };
    if bg_state.is_processing() || upload_state.uploading {
        feedback_writer.write(OutreachFeedback::error(SETTINGS_BUSY_MESSAGE));
        return;
    }
    let rebuilt = apply_settings(&mut settings, &mut gateway, event.settings.clone());
    if let Err(e) = save_settings(&settings) {
        error!("Failed to persist settings: {}", e);
        feedback_writer.write(OutreachFeedback::error(format!("Settings not saved: {}", e)));
    }
    if rebuilt {
        fetch_writer.write(RequestFetchRows);
    }
}

/// Swaps in `new`; returns true when the base URL changed and the gateway was rebuilt.
pub fn apply_settings(settings: &mut AppSettings, gateway: &mut GatewayHandle, new: AppSettings) -> bool {
    let base_changed = new.api_base_url != settings.api_base_url;
    *settings = new;
    if base_changed {
        *gateway = GatewayHandle::from_base_url(&settings.api_base_url);
    }
    base_changed
}
