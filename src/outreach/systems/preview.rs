// src/outreach/systems/preview.rs
use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;
use std::sync::Arc;

use crate::gateway::{GatewayError, MailApi, Operation};
use crate::outreach::definitions::RowFields;
use crate::outreach::events::{PreviewFetched, RequestPreview};
use crate::outreach::resources::{ContactRegistry, GatewayHandle};
use crate::ui::systems::SendEvent;

/// One preview call for one row.
pub struct PreviewJob {
    api: Arc<dyn MailApi>,
    row_index: i64,
    data: RowFields,
}

impl PreviewJob {
    pub async fn run(self) -> PreviewFetched {
        let result = self.api.preview(&self.data).await;
        PreviewFetched {
            row_index: self.row_index,
            result,
        }
    }
}

/// `None` for a row that is no longer loaded. Without a gateway the failure
/// is produced right away instead of a job.
pub fn start_preview(
    row_index: i64,
    registry: &ContactRegistry,
    gateway: &GatewayHandle,
) -> Option<Result<PreviewJob, PreviewFetched>> {
    let row = registry.find_row(row_index)?;
    Some(match gateway.api() {
        Ok(api) => Ok(PreviewJob {
            api,
            row_index,
            data: row.data.clone(),
        }),
        Err(msg) => Err(PreviewFetched {
            row_index,
            result: Err(GatewayError::Transport {
                operation: Operation::Preview,
                message: msg,
            }),
        }),
    })
}

/// Every request goes to the backend; previews are never cached.
pub fn handle_preview_request(
    mut events: EventReader<RequestPreview>,
    registry: Res<ContactRegistry>,
    gateway: Res<GatewayHandle>,
    runtime: Res<TokioTasksRuntime>,
    mut commands: Commands,
) {
    for event in events.read() {
        match start_preview(event.row_index, &registry, &gateway) {
            None => warn!("Preview requested for unknown row {}", event.row_index),
            Some(Err(failed)) => {
                commands.spawn(SendEvent { event: failed });
            }
            Some(Ok(job)) => {
                debug!("Requesting preview for row {}", event.row_index);
                runtime.spawn_background_task(move |mut ctx| async move {
                    let fetched = job.run().await;
                    ctx.run_on_main_thread(move |main_ctx| {
                        main_ctx.world.spawn(SendEvent { event: fetched });
                    })
                    .await;
                });
            }
        }
    }
}
