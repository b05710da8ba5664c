// src/cli/list_rows.rs
use std::io::Write;

use super::CliError;
use crate::gateway::MailApi;

pub async fn run<W: Write>(api: &dyn MailApi, out: &mut W) -> Result<(), CliError> {
    let payload = api.fetch_rows().await?;

    writeln!(out, "{:<6} {:<24} {:<32} {}", "Index", "Name", "Email", "Channel")?;
    writeln!(out, "{}", "-".repeat(72))?;
    for row in &payload.rows {
        writeln!(
            out,
            "{:<6} {:<24} {:<32} {}",
            row.row_index,
            row.display_field("name"),
            row.display_field("email"),
            row.display_field("channel")
        )?;
    }
    writeln!(out, "\n{} row(s)", payload.reported_count())?;
    Ok(())
}
