// src/outreach/plugin.rs
use bevy::prelude::*;

use super::events::{
    CsvUploaded, OutreachFeedback, PreviewFetched, RequestApplySettings, RequestBatchRun,
    RequestFetchRows, RequestInitiateCsvUpload, RequestPreview, RequestUploadCsvFile, RowsFetched,
};
use super::resources::{BatchBackgroundState, ContactRegistry, GatewayHandle, UploadState};
use super::systems;
use super::systems::config::SettingsLoadError;
use crate::settings::AppSettings;
use crate::ui::systems::forward_events;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
enum OutreachSystemSet {
    /// Results posted back by background tasks become events.
    Forward,
    /// User requests start remote work.
    Requests,
    /// Results are applied to the registry and status line.
    ApplyResults,
}

/// Rows, selection, and all backend traffic. The settings it is built with
/// decide which backend the gateway talks to.
pub struct OutreachPlugin {
    pub settings: AppSettings,
    /// Set when the stored settings could not be used.
    pub settings_load_error: Option<String>,
}

impl Plugin for OutreachPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                OutreachSystemSet::Forward,
                OutreachSystemSet::Requests.after(OutreachSystemSet::Forward),
                OutreachSystemSet::ApplyResults.after(OutreachSystemSet::Requests),
            ),
        );

        app.insert_resource(self.settings.clone())
            .insert_resource(GatewayHandle::from_base_url(&self.settings.api_base_url))
            .init_resource::<ContactRegistry>()
            .init_resource::<BatchBackgroundState>()
            .init_resource::<UploadState>()
            .insert_resource(SettingsLoadError(self.settings_load_error.clone()));

        app.add_event::<RequestFetchRows>()
            .add_event::<RowsFetched>()
            .add_event::<RequestPreview>()
            .add_event::<PreviewFetched>()
            .add_event::<RequestBatchRun>()
            .add_event::<RequestInitiateCsvUpload>()
            .add_event::<RequestUploadCsvFile>()
            .add_event::<CsvUploaded>()
            .add_event::<RequestApplySettings>()
            .add_event::<OutreachFeedback>();

        app.add_systems(
            Startup,
            (
                systems::config::report_settings_load_error,
                systems::fetch::request_initial_fetch,
            ),
        );

        app.add_systems(
            Update,
            (
                forward_events::<RowsFetched>,
                forward_events::<PreviewFetched>,
                forward_events::<CsvUploaded>,
            )
                .in_set(OutreachSystemSet::Forward),
        );
        app.add_systems(
            Update,
            (
                systems::config::handle_apply_settings,
                systems::upload::handle_initiate_csv_upload,
                systems::fetch::handle_fetch_request,
                systems::preview::handle_preview_request,
                systems::dispatch::handle_batch_request,
                systems::upload::handle_csv_upload_request,
            )
                .chain()
                .in_set(OutreachSystemSet::Requests),
        );
        app.add_systems(
            Update,
            (
                systems::fetch::handle_rows_fetched,
                systems::upload::handle_csv_uploaded,
                systems::dispatch::poll_batch_channels,
            )
                .chain()
                .in_set(OutreachSystemSet::ApplyResults),
        );

        info!("OutreachPlugin initialized for {}", self.settings.api_base_url);
    }
}
