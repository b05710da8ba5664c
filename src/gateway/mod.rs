// src/gateway/mod.rs
//! Remote Data Gateway.
//!
//! A stateless wrapper over the outreach backend. It owns no data; every call
//! is request shape in / response shape out, and every non-2xx answer becomes a
//! [`GatewayError`] that still carries the backend's `detail` text.

pub mod client;
pub mod error;
#[cfg(test)]
pub mod stub;

use async_trait::async_trait;

use crate::outreach::definitions::{ActionReceipt, CsvFile, EmailPreview, Row, RowFields, RowsPayload};

pub use client::HttpMailApi;
pub use error::{GatewayError, Operation};

/// The five backend operations the client consumes.
///
/// Implemented by [`HttpMailApi`] for the real backend and by stubs in tests.
#[async_trait]
pub trait MailApi: Send + Sync {
    /// `GET /api/sheets`
    async fn fetch_rows(&self) -> Result<RowsPayload, GatewayError>;

    /// `POST /api/preview` with `{ data }`
    async fn preview(&self, data: &RowFields) -> Result<EmailPreview, GatewayError>;

    /// `POST /api/send` with the full row record
    async fn send(&self, row: &Row) -> Result<ActionReceipt, GatewayError>;

    /// `POST /api/draft` with the full row record
    async fn draft(&self, row: &Row) -> Result<ActionReceipt, GatewayError>;

    /// `POST /api/upload-csv`, multipart field `file`
    async fn upload_csv(&self, file: CsvFile) -> Result<RowsPayload, GatewayError>;
}
