// src/gateway/error.rs

use std::fmt;
use thiserror::Error;

/// Remote operation a gateway call belongs to. Used to pick the fallback
/// message when the backend gives no `detail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchRows,
    Preview,
    Send,
    Draft,
    UploadCsv,
}

impl Operation {
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::FetchRows => "Failed to fetch data",
            Operation::Preview => "Failed to generate preview",
            Operation::Send => "Failed to send email",
            Operation::Draft => "Failed to save draft",
            Operation::UploadCsv => "Failed to upload CSV",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::FetchRows => "fetch rows",
            Operation::Preview => "preview",
            Operation::Send => "send",
            Operation::Draft => "draft",
            Operation::UploadCsv => "upload csv",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Invalid API base URL '{0}': expected an http:// or https:// address")]
    InvalidBaseUrl(String),
    #[error("{operation} request failed: {message}")]
    Transport { operation: Operation, message: String },
    #[error("{operation} returned HTTP {status}: {}", .detail.as_deref().unwrap_or(.operation.fallback_message()))]
    Status {
        operation: Operation,
        status: u16,
        detail: Option<String>,
    },
    #[error("{operation} response could not be decoded: {message}")]
    Decode { operation: Operation, message: String },
    #[error("Failed to initialize HTTP client: {0}")]
    ClientInit(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl GatewayError {
    /// Text suitable for a status line: the backend `detail` when it sent one,
    /// otherwise a short per-operation message.
    pub fn user_detail(&self) -> String {
        match self {
            GatewayError::Status { operation, detail, .. } => detail
                .clone()
                .unwrap_or_else(|| operation.fallback_message().to_string()),
            GatewayError::Transport { message, .. } | GatewayError::Decode { message, .. } => {
                message.clone()
            }
            GatewayError::InvalidBaseUrl(_) | GatewayError::ClientInit(_) | GatewayError::Io(_) => {
                self.to_string()
            }
        }
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::Io(err.to_string())
    }
}

/// Pulls `detail` out of an error body. FastAPI validation errors carry an
/// array there, which is rendered as compact JSON.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Null => None,
        serde_json::Value::String(_) => None,
        other => Some(other.to_string()),
    }
}
