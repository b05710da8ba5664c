// src/outreach/systems/upload.rs
use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;
use std::path::{Path, PathBuf};

use crate::gateway::{GatewayError, MailApi};
use crate::outreach::definitions::{CsvFile, RowsPayload};
use crate::outreach::events::{CsvUploaded, OutreachFeedback, RequestInitiateCsvUpload, RequestUploadCsvFile};
use crate::outreach::resources::{BatchBackgroundState, ContactRegistry, GatewayHandle, UploadState};
use crate::ui::systems::SendEvent;

pub const UPLOADING_MESSAGE: &str = "Uploading CSV...";

pub fn upload_success_message(count: usize) -> String {
    format!("Loaded {} rows from CSV", count)
}

pub fn upload_error_message(err: &GatewayError) -> String {
    format!("Error uploading CSV: {}", err.user_detail())
}

/// Reads the file and hands it to the gateway. The CSV is not inspected here;
/// the backend does all parsing.
pub async fn upload_csv_from_path(api: &dyn MailApi, path: &Path) -> Result<RowsPayload, GatewayError> {
    let contents = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.csv".to_string());
    api.upload_csv(CsvFile { file_name, contents }).await
}

/// Why an upload can't start now, if it can't. A row fetch in flight would
/// overwrite the uploaded rows when it lands.
pub fn upload_refusal(uploading: bool, processing: bool, loading: bool) -> Option<&'static str> {
    if uploading {
        Some("an upload is already running")
    } else if processing {
        Some("a batch run is in progress")
    } else if loading {
        Some("rows are still loading")
    } else {
        None
    }
}

pub fn handle_initiate_csv_upload(
    mut events: EventReader<RequestInitiateCsvUpload>,
    mut upload_writer: EventWriter<RequestUploadCsvFile>,
) {
    for _ in events.read() {
        let picked_file: Option<PathBuf> = rfd::FileDialog::new()
            .add_filter("CSV files", &["csv"])
            .set_title("Select contact CSV to upload")
            .pick_file();
        match picked_file {
            Some(path) => {
                upload_writer.write(RequestUploadCsvFile { path });
            }
            None => info!("CSV selection cancelled."),
        }
    }
}

pub fn handle_csv_upload_request(
    mut events: EventReader<RequestUploadCsvFile>,
    mut upload_state: ResMut<UploadState>,
    bg_state: Res<BatchBackgroundState>,
    registry: Res<ContactRegistry>,
    gateway: Res<GatewayHandle>,
    runtime: Res<TokioTasksRuntime>,
    mut feedback_writer: EventWriter<OutreachFeedback>,
) {
    for event in events.read() {
        if let Some(reason) = upload_refusal(upload_state.uploading, bg_state.is_processing(), registry.loading) {
            warn!("Ignoring CSV upload of {:?}: {}", event.path, reason);
            continue;
        }
        let api = match gateway.api() {
            Ok(api) => api,
            Err(msg) => {
                feedback_writer.write(OutreachFeedback::error(format!("Error uploading CSV: {}", msg)));
                continue;
            }
        };
        upload_state.uploading = true;
        feedback_writer.write(OutreachFeedback::info(UPLOADING_MESSAGE));
        let path = event.path.clone();
        info!("Uploading CSV {:?}", path);
        runtime.spawn_background_task(move |mut ctx| async move {
            let result = upload_csv_from_path(api.as_ref(), &path).await;
            ctx.run_on_main_thread(move |main_ctx| {
                main_ctx.world.spawn(SendEvent {
                    event: CsvUploaded { result },
                });
            })
            .await;
        });
    }
}

/// An uploaded CSV becomes the new row list, clearing the selection.
pub fn handle_csv_uploaded(
    mut events: EventReader<CsvUploaded>,
    mut upload_state: ResMut<UploadState>,
    mut registry: ResMut<ContactRegistry>,
    mut feedback_writer: EventWriter<OutreachFeedback>,
) {
    for event in events.read() {
        upload_state.uploading = false;
        match &event.result {
            Ok(payload) => {
                registry.selection.replace_rows(payload.rows.clone());
                registry.loaded_once = true;
                feedback_writer.write(OutreachFeedback::info(upload_success_message(payload.reported_count())));
            }
            Err(e) => {
                error!("CSV upload failed: {}", e);
                feedback_writer.write(OutreachFeedback::error(upload_error_message(e)));
            }
        }
    }
}
