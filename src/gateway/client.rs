// src/gateway/client.rs

use async_trait::async_trait;
use bevy::log::{debug, warn};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fmt;

use super::error::{extract_detail, GatewayError, Operation};
use super::MailApi;
use crate::outreach::definitions::{ActionReceipt, CsvFile, EmailPreview, Row, RowFields, RowsPayload};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

const SHEETS_PATH: &str = "/api/sheets";
const PREVIEW_PATH: &str = "/api/preview";
const SEND_PATH: &str = "/api/send";
const DRAFT_PATH: &str = "/api/draft";
const UPLOAD_CSV_PATH: &str = "/api/upload-csv";

/// reqwest-backed gateway. The base URL is injected at construction so the
/// client can be pointed at any backend (or a local fake in tests).
#[derive(Clone)]
pub struct HttpMailApi {
    base_url: String,
    client: reqwest::Client,
}

impl fmt::Debug for HttpMailApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpMailApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpMailApi {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let base_url = normalize_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("sheet_mailer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::ClientInit(e.to_string()))?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_row(&self, operation: Operation, path: &str, row: &Row) -> Result<ActionReceipt, GatewayError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(row)
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;
        let body = checked_body(operation, response).await?;
        if body.trim().is_empty() {
            return Ok(ActionReceipt::default());
        }
        // The success body is backend-defined; a shape we can't read is still a success.
        match serde_json::from_str::<ActionReceipt>(&body) {
            Ok(receipt) => Ok(receipt),
            Err(e) => {
                debug!("{} succeeded with an unrecognized body ({}), ignoring it", operation, e);
                Ok(ActionReceipt::default())
            }
        }
    }
}

/// Trims whitespace and trailing slashes and drops a trailing `/api` segment,
/// since every request path already starts with `/api`.
pub fn normalize_base_url(raw: &str) -> Result<String, GatewayError> {
    let mut base = raw.trim().trim_end_matches('/').to_string();
    if let Some(stripped) = base.strip_suffix("/api") {
        base = stripped.trim_end_matches('/').to_string();
    }
    let host_part = base
        .strip_prefix("http://")
        .or_else(|| base.strip_prefix("https://"));
    match host_part {
        Some(rest) if !rest.is_empty() => Ok(base),
        _ => Err(GatewayError::InvalidBaseUrl(raw.trim().to_string())),
    }
}

fn transport_error(operation: Operation, err: reqwest::Error) -> GatewayError {
    GatewayError::Transport {
        operation,
        message: err.to_string(),
    }
}

/// Reads the body, turning non-2xx answers into `GatewayError::Status`.
async fn checked_body(operation: Operation, response: reqwest::Response) -> Result<String, GatewayError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(operation, e))?;
    if !status.is_success() {
        let detail = extract_detail(&body);
        warn!("{} failed with HTTP {} (detail: {:?})", operation, status.as_u16(), detail);
        return Err(GatewayError::Status {
            operation,
            status: status.as_u16(),
            detail,
        });
    }
    Ok(body)
}

async fn read_json<T: DeserializeOwned>(operation: Operation, response: reqwest::Response) -> Result<T, GatewayError> {
    let body = checked_body(operation, response).await?;
    serde_json::from_str(&body).map_err(|e| GatewayError::Decode {
        operation,
        message: e.to_string(),
    })
}

#[async_trait]
impl MailApi for HttpMailApi {
    async fn fetch_rows(&self) -> Result<RowsPayload, GatewayError> {
        let operation = Operation::FetchRows;
        let response = self
            .client
            .get(self.endpoint(SHEETS_PATH))
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;
        read_json(operation, response).await
    }

    async fn preview(&self, data: &RowFields) -> Result<EmailPreview, GatewayError> {
        let operation = Operation::Preview;
        let response = self
            .client
            .post(self.endpoint(PREVIEW_PATH))
            .json(&json!({ "data": data }))
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;
        read_json(operation, response).await
    }

    async fn send(&self, row: &Row) -> Result<ActionReceipt, GatewayError> {
        self.post_row(Operation::Send, SEND_PATH, row).await
    }

    async fn draft(&self, row: &Row) -> Result<ActionReceipt, GatewayError> {
        self.post_row(Operation::Draft, DRAFT_PATH, row).await
    }

    async fn upload_csv(&self, file: CsvFile) -> Result<RowsPayload, GatewayError> {
        let operation = Operation::UploadCsv;
        let part = Part::bytes(file.contents)
            .file_name(file.file_name)
            .mime_str("text/csv")
            .map_err(|e| transport_error(operation, e))?;
        let form = Form::new().part("file", part);
        let response = self
            .client
            .post(self.endpoint(UPLOAD_CSV_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;
        read_json(operation, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves exactly one canned HTTP response and hands back the raw request.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            let header_end = loop {
                let n = socket.read(&mut buf).await.unwrap();
                raw.extend_from_slice(&buf[..n]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let headers = String::from_utf8_lossy(&raw[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            let chunked = headers.contains("transfer-encoding: chunked");
            while (chunked && !raw.ends_with(b"0\r\n\r\n"))
                || (!chunked && raw.len() < header_end + content_length)
            {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        });
        (format!("http://{}", addr), handle)
    }

    #[test]
    fn normalize_base_url_accepts_and_trims() {
        assert_eq!(normalize_base_url(" http://localhost:8000/ ").unwrap(), "http://localhost:8000");
        assert_eq!(normalize_base_url("http://localhost:8000/api").unwrap(), "http://localhost:8000");
        assert_eq!(normalize_base_url("https://mail.example.com/api/").unwrap(), "https://mail.example.com");
        assert_eq!(normalize_base_url("http://host/prefix").unwrap(), "http://host/prefix");
    }

    #[test]
    fn normalize_base_url_rejects_garbage() {
        assert!(matches!(normalize_base_url(""), Err(GatewayError::InvalidBaseUrl(_))));
        assert!(matches!(normalize_base_url("localhost:8000"), Err(GatewayError::InvalidBaseUrl(_))));
        assert!(matches!(normalize_base_url("http://"), Err(GatewayError::InvalidBaseUrl(_))));
    }

    #[tokio::test]
    async fn fetch_rows_reads_rows_payload() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"count":1,"rows":[{"row_index":0,"data":{"name":"Ada"}}]}"#,
        )
        .await;
        let api = HttpMailApi::new(&base).unwrap();
        let payload = api.fetch_rows().await.unwrap();
        assert_eq!(payload.rows.len(), 1);
        assert_eq!(payload.rows[0].display_field("name"), "Ada");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/sheets HTTP/1.1"));
    }

    #[tokio::test]
    async fn send_posts_full_row_and_surfaces_detail_on_failure() {
        let (base, server) = serve_once("400 Bad Request", r#"{"detail":"No email address in row data"}"#).await;
        let api = HttpMailApi::new(&base).unwrap();
        let mut data = RowFields::new();
        data.insert("name".into(), json!("Ada"));
        let err = api.send(&Row::new(4, data)).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::Status {
                operation: Operation::Send,
                status: 400,
                detail: Some("No email address in row data".to_string()),
            }
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/send HTTP/1.1"));
        assert!(request.ends_with(r#"{"row_index":4,"data":{"name":"Ada"}}"#));
    }

    #[tokio::test]
    async fn upload_failure_keeps_backend_detail() {
        let (base, server) = serve_once("400 Bad Request", r#"{"detail":"bad format"}"#).await;
        let api = HttpMailApi::new(&base).unwrap();
        let err = api
            .upload_csv(CsvFile {
                file_name: "contacts.csv".to_string(),
                contents: b"name,email\nAda,ada@example.com\n".to_vec(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.user_detail(), "bad format");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/upload-csv HTTP/1.1"));
        assert!(request.contains("name=\"file\"; filename=\"contacts.csv\""));
    }

    #[tokio::test]
    async fn draft_accepts_empty_success_body() {
        let (base, server) = serve_once("200 OK", "").await;
        let api = HttpMailApi::new(&base).unwrap();
        let receipt = api.draft(&Row::new(0, RowFields::new())).await.unwrap();
        assert_eq!(receipt, ActionReceipt::default());
        server.await.unwrap();
    }
}
