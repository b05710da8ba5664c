// src/cli/preview_row.rs
use std::io::Write;

use super::CliError;
use crate::gateway::MailApi;

pub async fn run<W: Write>(api: &dyn MailApi, row_index: i64, out: &mut W) -> Result<(), CliError> {
    let payload = api.fetch_rows().await?;
    let row = payload
        .rows
        .iter()
        .find(|r| r.row_index == row_index)
        .ok_or_else(|| CliError::UnknownRows(vec![row_index]))?;

    let preview = api.preview(&row.data).await?;
    writeln!(out, "Subject: {}", preview.subject)?;
    writeln!(out)?;
    writeln!(out, "{}", preview.body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::stub::{row, StubCall, StubMailApi};
    use crate::outreach::definitions::{EmailPreview, RowsPayload};

    fn stub_with_rows() -> StubMailApi {
        let stub = StubMailApi::new();
        stub.push_rows(Ok(RowsPayload {
            rows: vec![row(0, "Ada", "a@x"), row(1, "Bo", "b@x")],
            count: Some(2),
        }));
        stub
    }

    #[tokio::test]
    async fn previews_the_requested_row_data() {
        let stub = stub_with_rows();
        stub.push_preview(Ok(EmailPreview {
            subject: "Hi Bo".to_string(),
            body: "Hello Bo,\nThanks.".to_string(),
        }));
        let mut out = Vec::new();
        run(&stub, 1, &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Subject: Hi Bo\n\nHello Bo,\nThanks.\n");
        assert_eq!(stub.calls()[1], StubCall::Preview(row(1, "Bo", "b@x").data));
    }

    #[tokio::test]
    async fn unknown_row_is_rejected_before_preview() {
        let stub = stub_with_rows();
        let mut out = Vec::new();
        let err = run(&stub, 9, &mut out).await.unwrap_err();
        assert!(matches!(err, CliError::UnknownRows(ref v) if v == &vec![9]));
        assert_eq!(stub.calls(), vec![StubCall::FetchRows]);
    }
}
