// src/gateway/stub.rs
// Scripted MailApi used by unit tests across the crate.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{GatewayError, MailApi, Operation};
use crate::outreach::definitions::{ActionReceipt, CsvFile, EmailPreview, Row, RowFields, RowsPayload};

#[derive(Debug, Clone, PartialEq)]
pub enum StubCall {
    FetchRows,
    Preview(RowFields),
    Send(i64),
    Draft(i64),
    UploadCsv(String),
}

#[derive(Default)]
pub struct StubMailApi {
    calls: Mutex<Vec<StubCall>>,
    rows: Mutex<VecDeque<Result<RowsPayload, GatewayError>>>,
    previews: Mutex<VecDeque<Result<EmailPreview, GatewayError>>>,
    actions: Mutex<VecDeque<Result<ActionReceipt, GatewayError>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    action_delay: Option<Duration>,
}

impl StubMailApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each row action sleeps this long, so overlapping calls would be visible.
    pub fn with_action_delay(mut self, delay: Duration) -> Self {
        self.action_delay = Some(delay);
        self
    }

    pub fn push_rows(&self, result: Result<RowsPayload, GatewayError>) {
        self.rows.lock().unwrap().push_back(result);
    }

    pub fn push_preview(&self, result: Result<EmailPreview, GatewayError>) {
        self.previews.lock().unwrap().push_back(result);
    }

    pub fn push_action(&self, result: Result<ActionReceipt, GatewayError>) {
        self.actions.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: StubCall) {
        self.calls.lock().unwrap().push(call);
    }

    async fn row_action(&self, operation: Operation) -> Result<ActionReceipt, GatewayError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.action_delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.actions.lock().unwrap().pop_front();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        next.unwrap_or(Err(GatewayError::Status {
            operation,
            status: 500,
            detail: Some("stub has no scripted outcome".to_string()),
        }))
    }
}

pub fn row(row_index: i64, name: &str, email: &str) -> Row {
    let mut data = RowFields::new();
    data.insert("name".into(), serde_json::Value::String(name.to_string()));
    data.insert("email".into(), serde_json::Value::String(email.to_string()));
    Row::new(row_index, data)
}

pub fn failure(operation: Operation, detail: &str) -> GatewayError {
    GatewayError::Status {
        operation,
        status: 500,
        detail: Some(detail.to_string()),
    }
}

#[async_trait]
impl MailApi for StubMailApi {
    async fn fetch_rows(&self) -> Result<RowsPayload, GatewayError> {
        self.record(StubCall::FetchRows);
        self.rows
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(failure(Operation::FetchRows, "stub has no rows")))
    }

    async fn preview(&self, data: &RowFields) -> Result<EmailPreview, GatewayError> {
        self.record(StubCall::Preview(data.clone()));
        self.previews
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(failure(Operation::Preview, "stub has no preview")))
    }

    async fn send(&self, row: &Row) -> Result<ActionReceipt, GatewayError> {
        self.record(StubCall::Send(row.row_index));
        self.row_action(Operation::Send).await
    }

    async fn draft(&self, row: &Row) -> Result<ActionReceipt, GatewayError> {
        self.record(StubCall::Draft(row.row_index));
        self.row_action(Operation::Draft).await
    }

    async fn upload_csv(&self, file: CsvFile) -> Result<RowsPayload, GatewayError> {
        self.record(StubCall::UploadCsv(file.file_name));
        self.rows
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(failure(Operation::UploadCsv, "stub has no rows")))
    }
}
