// src/outreach/systems/dispatch.rs
use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;
use std::sync::mpsc::{channel, Sender, TryRecvError};
use std::sync::{Arc, Mutex};

use crate::gateway::MailApi;
use crate::outreach::batch::{dispatch_batch, prepare_batch, BatchError, BatchReport, BATCH_FAILURE_MESSAGE};
use crate::outreach::definitions::{BatchMode, Row};
use crate::outreach::events::{OutreachFeedback, RequestBatchRun};
use crate::outreach::resources::{BatchBackgroundState, ContactRegistry, GatewayHandle};

/// A batch run ready to go, with the sending ends of its channels.
pub struct BatchJob {
    api: Arc<dyn MailApi>,
    mode: BatchMode,
    rows: Vec<Row>,
    progress_tx: Sender<String>,
    done_tx: Sender<Result<BatchReport, BatchError>>,
}

impl BatchJob {
    pub async fn run(self) {
        let progress_tx = self.progress_tx;
        let report = dispatch_batch(self.api, self.mode, self.rows, move |msg| {
            let _ = progress_tx.send(msg);
        })
        .await;
        let _ = self.done_tx.send(Ok(report));
    }
}

/// Turns batch requests into jobs. Requests arriving while a run is in
/// progress, or with nothing selected, are dropped with a warning. Status
/// updates are pushed to `feedback` in order.
pub fn begin_batch_runs<'a>(
    requests: impl IntoIterator<Item = &'a RequestBatchRun>,
    registry: &ContactRegistry,
    gateway: &GatewayHandle,
    bg_state: &mut BatchBackgroundState,
    feedback: &mut Vec<OutreachFeedback>,
) -> Vec<BatchJob> {
    let mut jobs = Vec::new();
    for request in requests {
        let mode = request.mode;
        let confirmed = request.confirmed.as_deref();
        let rows = match prepare_batch(&registry.selection, bg_state.is_processing(), confirmed) {
            Ok(rows) => rows,
            Err(e) if e.is_rejection() => {
                warn!("Ignoring {} request: {}", mode.label(), e);
                continue;
            }
            Err(e) => {
                error!("{} batch could not start: {}", mode.label(), e);
                feedback.push(OutreachFeedback::error(e.status_message()));
                continue;
            }
        };
        let api = match gateway.api() {
            Ok(api) => api,
            Err(msg) => {
                error!("{} batch could not start: {}", mode.label(), msg);
                feedback.push(OutreachFeedback::error(BATCH_FAILURE_MESSAGE));
                continue;
            }
        };

        let (progress_tx, rx_prog) = channel::<String>();
        let (done_tx, rx_done) = channel::<Result<BatchReport, BatchError>>();
        bg_state.progress_rx = Some(Arc::new(Mutex::new(rx_prog)));
        bg_state.completion_rx = Some(Arc::new(Mutex::new(rx_done)));
        feedback.push(OutreachFeedback::clear());
        jobs.push(BatchJob {
            api,
            mode,
            rows,
            progress_tx,
            done_tx,
        });
    }
    jobs
}

pub fn handle_batch_request(
    mut events: EventReader<RequestBatchRun>,
    registry: Res<ContactRegistry>,
    gateway: Res<GatewayHandle>,
    runtime: Res<TokioTasksRuntime>,
    mut bg_state: ResMut<BatchBackgroundState>,
    mut feedback_writer: EventWriter<OutreachFeedback>,
) {
    let mut feedback = Vec::new();
    let jobs = begin_batch_runs(events.read(), &registry, &gateway, &mut bg_state, &mut feedback);
    for message in feedback {
        feedback_writer.write(message);
    }
    for job in jobs {
        runtime.spawn_background_task(move |_ctx| job.run());
    }
}

/// Drains progress into the status line and closes out a finished run.
pub fn poll_batch_channels(
    mut bg_state: ResMut<BatchBackgroundState>,
    mut feedback_writer: EventWriter<OutreachFeedback>,
) {
    if let Some(rx) = &bg_state.progress_rx {
        if let Ok(rx) = rx.lock() {
            for msg in rx.try_iter() {
                feedback_writer.write(OutreachFeedback::info(msg));
            }
        }
    }

    let outcome = {
        let Some(rx) = &bg_state.completion_rx else {
            return;
        };
        match rx.lock() {
            Ok(rx) => match rx.try_recv() {
                Ok(outcome) => outcome,
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => Err(BatchError::Interrupted(
                    "background task ended without a result".to_string(),
                )),
            },
            Err(_) => Err(BatchError::Interrupted("completion channel poisoned".to_string())),
        }
    };
    bg_state.finish();

    match outcome {
        Ok(report) => {
            for (row, err) in &report.summary.failures {
                debug!("Row {} not processed: {}", row.row_index, err.user_detail());
            }
            feedback_writer.write(OutreachFeedback::info(report.completion_message()));
        }
        Err(e) => {
            error!("Batch run failed: {}", e);
            feedback_writer.write(OutreachFeedback::error(e.status_message()));
        }
    }
}
