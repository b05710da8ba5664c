// src/outreach/resources.rs
use bevy::prelude::*;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};

use super::batch::{BatchError, BatchReport};
use super::definitions::Row;
use super::selection::RowSelection;
use crate::gateway::{GatewayError, HttpMailApi, MailApi};

/// Loaded contact rows and the user's selection over them.
#[derive(Resource, Debug, Default)]
pub struct ContactRegistry {
    pub selection: RowSelection,
    /// True while a row fetch is in flight.
    pub loading: bool,
    /// Set once the first fetch has answered, successfully or not.
    pub loaded_once: bool,
}

impl ContactRegistry {
    pub fn rows(&self) -> &[Row] {
        self.selection.rows()
    }

    pub fn find_row(&self, row_index: i64) -> Option<&Row> {
        self.rows().iter().find(|r| r.row_index == row_index)
    }
}

/// The gateway every background task talks to. Rebuilt when the base URL changes.
#[derive(Resource, Clone)]
pub struct GatewayHandle {
    api: Option<Arc<dyn MailApi>>,
    base_url: String,
    error: Option<String>,
}

impl GatewayHandle {
    pub fn from_base_url(base_url: &str) -> Self {
        match HttpMailApi::new(base_url) {
            Ok(api) => {
                info!("Gateway configured for {}", api.base_url());
                Self {
                    base_url: api.base_url().to_string(),
                    api: Some(Arc::new(api)),
                    error: None,
                }
            }
            Err(e) => {
                error!("Gateway unavailable: {}", e);
                Self {
                    api: None,
                    base_url: base_url.to_string(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn with_api(api: Arc<dyn MailApi>, base_url: impl Into<String>) -> Self {
        Self {
            api: Some(api),
            base_url: base_url.into(),
            error: None,
        }
    }

    /// The configured gateway, or the message explaining why there is none.
    pub fn api(&self) -> Result<Arc<dyn MailApi>, String> {
        match &self.api {
            Some(api) => Ok(Arc::clone(api)),
            None => Err(self
                .error
                .clone()
                .unwrap_or_else(|| GatewayError::InvalidBaseUrl(self.base_url.clone()).to_string())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Channels of the running batch, drained every frame.
/// A batch is in progress exactly while `completion_rx` is held.
#[derive(Resource, Default)]
pub struct BatchBackgroundState {
    pub progress_rx: Option<Arc<Mutex<Receiver<String>>>>,
    pub completion_rx: Option<Arc<Mutex<Receiver<Result<BatchReport, BatchError>>>>>,
}

impl BatchBackgroundState {
    pub fn is_processing(&self) -> bool {
        self.completion_rx.is_some()
    }

    pub fn finish(&mut self) {
        self.progress_rx = None;
        self.completion_rx = None;
    }
}

#[derive(Resource, Debug, Default)]
pub struct UploadState {
    pub uploading: bool,
}
