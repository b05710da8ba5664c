// src/outreach/batch.rs
//! Sequential task runner and the Batch Dispatcher built on it.
//!
//! A batch run issues exactly one remote call per selected row, strictly one at
//! a time. A failing row is logged and counted, never retried, and never stops
//! the run. Only failures outside the per-row boundary (see [`BatchError`])
//! abort a run as a whole.

use bevy::log::{info, warn};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use super::definitions::{BatchMode, Row};
use super::selection::{RowSelection, SelectionError};
use crate::gateway::{GatewayError, MailApi};

/// Status line shown when a run fails outside the per-row error boundary.
pub const BATCH_FAILURE_MESSAGE: &str = "Error during batch process.";

/// Status line when a confirmed send no longer matches the selection.
pub const SELECTION_CHANGED_MESSAGE: &str = "Selection changed after confirmation. Nothing was sent.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("No rows selected")]
    EmptySelection,
    #[error("A batch run is already in progress")]
    AlreadyRunning,
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("Batch run stopped before reporting a result: {0}")]
    Interrupted(String),
    #[error("Confirmed rows {confirmed:?} no longer match the selection {current:?}")]
    SelectionChanged { confirmed: Vec<i64>, current: Vec<i64> },
}

impl BatchError {
    /// Precondition rejections are the caller's business and don't touch the
    /// status line; everything else is the coarse failure path.
    pub fn is_rejection(&self) -> bool {
        matches!(self, BatchError::EmptySelection | BatchError::AlreadyRunning)
    }

    /// Status line text for a run that could not start or finish.
    pub fn status_message(&self) -> &'static str {
        match self {
            BatchError::SelectionChanged { .. } => SELECTION_CHANGED_MESSAGE,
            _ => BATCH_FAILURE_MESSAGE,
        }
    }
}

/// Outcome of one sequential run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary<T, E> {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<(T, E)>,
}

impl<T, E> Default for BatchSummary<T, E> {
    fn default() -> Self {
        Self {
            attempted: 0,
            succeeded: 0,
            failures: Vec::new(),
        }
    }
}

/// Runs `op` over `items` in order, awaiting each call before starting the
/// next. `on_start(position, total)` fires before each call with a 1-based
/// position.
pub async fn run_sequential<T, R, E, Op, Fut, P>(items: Vec<T>, mut op: Op, mut on_start: P) -> BatchSummary<T, E>
where
    T: Clone,
    Op: FnMut(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    P: FnMut(usize, usize),
{
    let total = items.len();
    let mut summary = BatchSummary::default();
    for (position, item) in items.into_iter().enumerate() {
        on_start(position + 1, total);
        summary.attempted += 1;
        match op(item.clone()).await {
            Ok(_) => summary.succeeded += 1,
            Err(e) => summary.failures.push((item, e)),
        }
    }
    summary
}

/// Result of a finished dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub mode: BatchMode,
    pub summary: BatchSummary<Row, GatewayError>,
}

impl BatchReport {
    pub fn completion_message(&self) -> String {
        self.mode.completion_message(self.summary.succeeded)
    }
}

/// Checks the dispatcher preconditions and materializes the rows to process.
/// `confirmed` is the row set the user agreed to; a run only starts if the
/// selection still matches it exactly.
pub fn prepare_batch(
    selection: &RowSelection,
    processing: bool,
    confirmed: Option<&[i64]>,
) -> Result<Vec<Row>, BatchError> {
    if processing {
        return Err(BatchError::AlreadyRunning);
    }
    if selection.is_empty() {
        return Err(BatchError::EmptySelection);
    }
    if let Some(confirmed) = confirmed {
        let current = selection.selected_indices();
        if current.as_slice() != confirmed {
            return Err(BatchError::SelectionChanged {
                confirmed: confirmed.to_vec(),
                current,
            });
        }
    }
    Ok(selection.selected_rows()?)
}

/// Drafts or sends every row in `rows`. `report` receives the live status
/// line, set before each call so it names the row about to be processed.
pub async fn dispatch_batch<P>(api: Arc<dyn MailApi>, mode: BatchMode, rows: Vec<Row>, mut report: P) -> BatchReport
where
    P: FnMut(String),
{
    info!("Starting {} batch over {} row(s)", mode.label(), rows.len());
    let summary = run_sequential(
        rows,
        |row: Row| {
            let api = Arc::clone(&api);
            async move {
                let outcome = match mode {
                    BatchMode::Draft => api.draft(&row).await,
                    BatchMode::Send => api.send(&row).await,
                };
                if let Err(e) = &outcome {
                    warn!("{} failed for row {}: {}", mode.label(), row.row_index, e);
                }
                outcome
            }
        },
        |current, total| report(mode.progress_message(current, total)),
    )
    .await;
    info!(
        "{} batch finished: {}/{} succeeded",
        mode.label(),
        summary.succeeded,
        summary.attempted
    );
    BatchReport { mode, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::stub::{failure, row, StubCall, StubMailApi};
    use crate::gateway::Operation;
    use crate::outreach::definitions::ActionReceipt;
    use std::time::Duration;

    #[tokio::test]
    async fn runner_counts_failures_without_stopping() {
        let summary = run_sequential(
            vec![1, 2, 3, 4],
            |n: i32| async move { if n % 2 == 0 { Err(format!("even {}", n)) } else { Ok(n) } },
            |_, _| {},
        )
        .await;
        assert_eq!(summary.attempted, 4);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(
            summary.failures,
            vec![(2, "even 2".to_string()), (4, "even 4".to_string())]
        );
    }

    #[tokio::test]
    async fn runner_reports_position_before_each_item() {
        let mut events = Vec::new();
        let log = std::sync::Mutex::new(Vec::new());
        let summary = run_sequential(
            vec!["a", "b"],
            |item: &str| {
                log.lock().unwrap().push(format!("call {}", item));
                async move { Ok::<_, ()>(()) }
            },
            |current, total| events.push((current, total)),
        )
        .await;
        assert_eq!(summary.succeeded, 2);
        assert_eq!(events, vec![(1, 2), (2, 2)]);
        assert_eq!(*log.lock().unwrap(), vec!["call a", "call b"]);
    }

    #[tokio::test]
    async fn draft_batch_survives_middle_failure() {
        let stub = Arc::new(StubMailApi::new());
        stub.push_action(Ok(ActionReceipt::default()));
        stub.push_action(Err(failure(Operation::Draft, "smtp down")));
        stub.push_action(Ok(ActionReceipt::default()));
        let rows = vec![row(0, "Ada", "a@x"), row(1, "Bo", "b@x"), row(2, "Cy", "c@x")];

        let mut messages = Vec::new();
        let report = dispatch_batch(stub.clone(), BatchMode::Draft, rows, |m| messages.push(m)).await;

        assert_eq!(report.completion_message(), "Completed! Drafted 2 emails.");
        assert_eq!(report.summary.attempted, 3);
        assert_eq!(report.summary.failures.len(), 1);
        assert_eq!(report.summary.failures[0].0.row_index, 1);
        assert_eq!(
            stub.calls(),
            vec![StubCall::Draft(0), StubCall::Draft(1), StubCall::Draft(2)]
        );
        assert_eq!(messages, vec!["Drafting... 1/3", "Drafting... 2/3", "Drafting... 3/3"]);
    }

    #[tokio::test]
    async fn calls_never_overlap() {
        let stub = Arc::new(StubMailApi::new().with_action_delay(Duration::from_millis(5)));
        for _ in 0..4 {
            stub.push_action(Ok(ActionReceipt::default()));
        }
        let rows = (0..4).map(|i| row(i, "n", "e")).collect();
        let report = dispatch_batch(stub.clone(), BatchMode::Send, rows, |_| {}).await;
        assert_eq!(report.summary.succeeded, 4);
        assert_eq!(stub.max_in_flight(), 1);
        assert_eq!(stub.calls().len(), 4);
    }

    #[tokio::test]
    async fn send_selection_of_two_with_one_failure() {
        let mut selection = RowSelection::new(vec![row(0, "A", "a@x"), row(1, "B", "b@x"), row(2, "C", "c@x")]);
        selection.toggle(0);
        selection.toggle(2);

        let stub = Arc::new(StubMailApi::new());
        stub.push_action(Ok(ActionReceipt::default()));
        stub.push_action(Err(GatewayError::Transport {
            operation: Operation::Send,
            message: "connection reset".to_string(),
        }));

        let rows = prepare_batch(&selection, false, None).unwrap();
        let report = dispatch_batch(stub.clone(), BatchMode::Send, rows, |_| {}).await;

        assert_eq!(report.completion_message(), "Completed! Sent 1 emails.");
        assert_eq!(stub.calls(), vec![StubCall::Send(0), StubCall::Send(2)]);
        assert_eq!(selection.selected_indices(), vec![0, 2]);
    }

    #[test]
    fn prepare_batch_rejects_empty_and_reentrant_runs() {
        let mut selection = RowSelection::new(vec![row(0, "A", "a@x")]);
        assert_eq!(prepare_batch(&selection, false, None), Err(BatchError::EmptySelection));
        selection.toggle(0);
        assert_eq!(prepare_batch(&selection, true, None), Err(BatchError::AlreadyRunning));
        assert!(BatchError::AlreadyRunning.is_rejection());
        assert!(!BatchError::Interrupted("join".into()).is_rejection());
        assert_eq!(prepare_batch(&selection, false, None).unwrap().len(), 1);
    }

    #[test]
    fn confirmed_send_must_match_current_selection() {
        let mut selection = RowSelection::new((0..5).map(|i| row(i, "n", "e")).collect());
        selection.toggle(1);
        selection.toggle(3);
        let confirmed = selection.selected_indices();
        assert_eq!(prepare_batch(&selection, false, Some(&confirmed)).unwrap().len(), 2);

        selection.select_all();
        let err = prepare_batch(&selection, false, Some(&confirmed)).unwrap_err();
        assert_eq!(
            err,
            BatchError::SelectionChanged {
                confirmed: vec![1, 3],
                current: vec![0, 1, 2, 3, 4],
            }
        );
        assert!(!err.is_rejection());
        assert_eq!(err.status_message(), SELECTION_CHANGED_MESSAGE);
    }
}
