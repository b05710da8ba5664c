// src/outreach/systems/fetch.rs
use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;

use crate::outreach::events::{OutreachFeedback, RequestFetchRows, RowsFetched};
use crate::outreach::resources::{ContactRegistry, GatewayHandle, UploadState};
use crate::ui::systems::SendEvent;

pub const FETCH_ERROR_MESSAGE: &str = "Error fetching data";

/// Startup: load rows as soon as the window opens.
pub fn request_initial_fetch(mut writer: EventWriter<RequestFetchRows>) {
    writer.write(RequestFetchRows);
}

pub fn handle_fetch_request(
    mut events: EventReader<RequestFetchRows>,
    mut registry: ResMut<ContactRegistry>,
    upload_state: Res<UploadState>,
    gateway: Res<GatewayHandle>,
    runtime: Res<TokioTasksRuntime>,
    mut feedback_writer: EventWriter<OutreachFeedback>,
) {
    // Several requests in one frame collapse into one fetch.
    if events.read().count() == 0 {
        return;
    }
    if registry.loading {
        debug!("Row fetch already in flight, ignoring request.");
        return;
    }
    if upload_state.uploading {
        warn!("Ignoring row fetch while a CSV upload is running.");
        return;
    }
    let api = match gateway.api() {
        Ok(api) => api,
        Err(msg) => {
            error!("Cannot fetch rows: {}", msg);
            registry.loaded_once = true;
            feedback_writer.write(OutreachFeedback::error(format!("{}: {}", FETCH_ERROR_MESSAGE, msg)));
            return;
        }
    };
    registry.loading = true;
    info!("Fetching rows from {}", gateway.base_url());
    runtime.spawn_background_task(move |mut ctx| async move {
        let result = api.fetch_rows().await;
        ctx.run_on_main_thread(move |main_ctx| {
            main_ctx.world.spawn(SendEvent {
                event: RowsFetched { result },
            });
        })
        .await;
    });
}

/// A successful fetch replaces the row list, which clears the selection.
/// A failed one leaves the current rows alone and reports on the status line.
pub fn handle_rows_fetched(
    mut events: EventReader<RowsFetched>,
    mut registry: ResMut<ContactRegistry>,
    mut feedback_writer: EventWriter<OutreachFeedback>,
) {
    for event in events.read() {
        registry.loading = false;
        registry.loaded_once = true;
        match &event.result {
            Ok(payload) => {
                info!("Loaded {} row(s)", payload.rows.len());
                registry.selection.replace_rows(payload.rows.clone());
            }
            Err(e) => {
                error!("Row fetch failed: {}", e);
                feedback_writer.write(OutreachFeedback::error(FETCH_ERROR_MESSAGE));
            }
        }
    }
}
