// src/cli/upload_csv.rs
use std::io::Write;
use std::path::Path;

use super::CliError;
use crate::gateway::MailApi;
use crate::outreach::systems::upload::{upload_csv_from_path, upload_error_message, upload_success_message};

/// Prints the same texts the window shows on its status line.
pub async fn run<W: Write>(api: &dyn MailApi, path: &Path, out: &mut W) -> Result<(), CliError> {
    let payload = upload_csv_from_path(api, path)
        .await
        .map_err(|e| CliError::Upload(upload_error_message(&e)))?;
    writeln!(out, "{}", upload_success_message(payload.reported_count()))?;
    Ok(())
}
