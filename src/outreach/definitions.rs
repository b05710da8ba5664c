// src/outreach/definitions.rs

use serde::{Deserialize, Serialize};

/// Free-form field mapping of one contact record, exactly as the backend sent it.
pub type RowFields = serde_json::Map<String, serde_json::Value>;

/// One contact record. `row_index` is unique and stable for a single load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub row_index: i64,
    #[serde(default)]
    pub data: RowFields,
}

impl Row {
    pub fn new(row_index: i64, data: RowFields) -> Self {
        Self { row_index, data }
    }

    /// Display text for a field. Missing, null and empty values render as `N/A`.
    pub fn display_field(&self, field: &str) -> String {
        match self.data.get(field) {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(serde_json::Value::Null) | Some(serde_json::Value::String(_)) | None => {
                "N/A".to_string()
            }
            Some(other) => other.to_string(),
        }
    }
}

/// Response of both the row fetch and the CSV upload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RowsPayload {
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub count: Option<usize>,
}

impl RowsPayload {
    /// Count reported by the backend, falling back to the number of rows received.
    pub fn reported_count(&self) -> usize {
        self.count.unwrap_or(self.rows.len())
    }
}

/// Rendered message for one row, as returned by `/api/preview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailPreview {
    pub subject: String,
    pub body: String,
}

/// Success body of `/api/send` and `/api/draft`. The shape is backend-defined,
/// so everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActionReceipt {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A CSV file ready to be submitted as multipart form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Which remote action a batch run performs per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BatchMode {
    #[default]
    Draft,
    Send,
}

impl BatchMode {
    pub fn label(self) -> &'static str {
        match self {
            BatchMode::Draft => "Draft",
            BatchMode::Send => "Send",
        }
    }

    /// Progressive form used in the live status line.
    pub fn progressive(self) -> &'static str {
        match self {
            BatchMode::Draft => "Drafting",
            BatchMode::Send => "Sending",
        }
    }

    /// Past form used in the completion summary.
    pub fn past(self) -> &'static str {
        match self {
            BatchMode::Draft => "Drafted",
            BatchMode::Send => "Sent",
        }
    }

    /// `"Drafting... 2/5"`; `current` is the 1-based attempt about to run.
    pub fn progress_message(self, current: usize, total: usize) -> String {
        format!("{}... {}/{}", self.progressive(), current, total)
    }

    /// `"Completed! Drafted 2 emails."`
    pub fn completion_message(self, succeeded: usize) -> String {
        format!("Completed! {} {} emails.", self.past(), succeeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_payload_decodes_backend_shape() {
        let payload: RowsPayload = serde_json::from_value(json!({
            "count": 2,
            "rows": [
                { "row_index": 0, "data": { "name": "Ada", "email": "ada@example.com" } },
                { "row_index": 1, "data": { "name": "Linus", "channel": "YouTube" } }
            ]
        }))
        .unwrap();
        assert_eq!(payload.rows.len(), 2);
        assert_eq!(payload.reported_count(), 2);
        assert_eq!(payload.rows[1].display_field("channel"), "YouTube");
        assert_eq!(payload.rows[1].display_field("email"), "N/A");
    }

    #[test]
    fn reported_count_falls_back_to_row_len() {
        let payload: RowsPayload =
            serde_json::from_value(json!({ "rows": [{ "row_index": 7, "data": {} }] })).unwrap();
        assert_eq!(payload.reported_count(), 1);
    }

    #[test]
    fn row_serializes_as_send_request_body() {
        let mut data = RowFields::new();
        data.insert("email".into(), json!("x@example.com"));
        let body = serde_json::to_value(Row::new(3, data)).unwrap();
        assert_eq!(body, json!({ "row_index": 3, "data": { "email": "x@example.com" } }));
    }

    #[test]
    fn display_field_handles_blank_and_non_string_values() {
        let mut data = RowFields::new();
        data.insert("name".into(), json!("   "));
        data.insert("followers".into(), json!(1200));
        data.insert("channel".into(), serde_json::Value::Null);
        let row = Row::new(0, data);
        assert_eq!(row.display_field("name"), "N/A");
        assert_eq!(row.display_field("channel"), "N/A");
        assert_eq!(row.display_field("followers"), "1200");
    }

    #[test]
    fn mode_messages_match_status_line_format() {
        assert_eq!(BatchMode::Draft.progress_message(1, 3), "Drafting... 1/3");
        assert_eq!(BatchMode::Send.progress_message(2, 2), "Sending... 2/2");
        assert_eq!(BatchMode::Draft.completion_message(2), "Completed! Drafted 2 emails.");
        assert_eq!(BatchMode::Send.completion_message(1), "Completed! Sent 1 emails.");
    }

    #[test]
    fn receipt_accepts_unknown_and_missing_fields() {
        let receipt: ActionReceipt =
            serde_json::from_value(json!({ "status": "sent", "email": "a@b.c", "extra": 1 })).unwrap();
        assert_eq!(receipt.status.as_deref(), Some("sent"));
        let empty: ActionReceipt = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, ActionReceipt::default());
    }
}
