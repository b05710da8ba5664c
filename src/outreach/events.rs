// src/outreach/events.rs
use bevy::prelude::Event;
use std::path::PathBuf;

use super::definitions::{BatchMode, EmailPreview, RowsPayload};
use crate::gateway::GatewayError;
use crate::settings::AppSettings;

/// Fetch (or refetch) the full row list from the backend.
#[derive(Event, Debug, Clone)]
pub struct RequestFetchRows;

/// Result of a row fetch, delivered back on the main thread.
#[derive(Event, Debug, Clone)]
pub struct RowsFetched {
    pub result: Result<RowsPayload, GatewayError>,
}

/// Ask the backend to render the message for one row.
#[derive(Event, Debug, Clone)]
pub struct RequestPreview {
    pub row_index: i64,
}

#[derive(Event, Debug, Clone)]
pub struct PreviewFetched {
    pub row_index: i64,
    pub result: Result<EmailPreview, GatewayError>,
}

/// Start a draft or send run over the current selection. When `confirmed`
/// is set, the run only starts if the selection is still exactly that set.
#[derive(Event, Debug, Clone)]
pub struct RequestBatchRun {
    pub mode: BatchMode,
    pub confirmed: Option<Vec<i64>>,
}

/// Open the file picker for a CSV upload.
#[derive(Event, Debug, Clone)]
pub struct RequestInitiateCsvUpload;

/// Upload a specific CSV file.
#[derive(Event, Debug, Clone)]
pub struct RequestUploadCsvFile {
    pub path: PathBuf,
}

#[derive(Event, Debug, Clone)]
pub struct CsvUploaded {
    pub result: Result<RowsPayload, GatewayError>,
}

/// Persist new settings and rebuild the gateway from them.
#[derive(Event, Debug, Clone)]
pub struct RequestApplySettings {
    pub settings: AppSettings,
}

/// Status line update. An empty message clears the line.
#[derive(Event, Debug, Clone)]
pub struct OutreachFeedback {
    pub message: String,
    pub is_error: bool,
}

impl OutreachFeedback {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }

    pub fn clear() -> Self {
        Self::info(String::new())
    }
}
