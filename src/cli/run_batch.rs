// src/cli/run_batch.rs
use std::io::Write;
use std::sync::Arc;

use super::{BatchArgs, CliError};
use crate::gateway::MailApi;
use crate::outreach::batch::{dispatch_batch, prepare_batch};
use crate::outreach::definitions::{BatchMode, Row};
use crate::outreach::selection::RowSelection;

/// Builds the selection the same way the table does: `--all` selects
/// everything, otherwise each listed index is toggled. Unknown indices are an
/// error instead of being ignored, so a typo never sends to the wrong set.
pub fn build_selection(rows: Vec<Row>, args: &BatchArgs) -> Result<RowSelection, CliError> {
    let mut selection = RowSelection::new(rows);
    let unknown: Vec<i64> = args
        .rows
        .iter()
        .copied()
        .filter(|idx| !selection.contains_row(*idx))
        .collect();
    if !unknown.is_empty() {
        return Err(CliError::UnknownRows(unknown));
    }

    if args.all {
        selection.select_all();
    } else {
        for idx in &args.rows {
            selection.toggle(*idx);
        }
    }
    Ok(selection)
}

pub async fn run<W: Write>(
    api: Arc<dyn MailApi>,
    mode: BatchMode,
    args: &BatchArgs,
    out: &mut W,
) -> Result<(), CliError> {
    let payload = api.fetch_rows().await?;
    let selection = build_selection(payload.rows, args)?;
    let rows = prepare_batch(&selection, false, None)?;

    let mut write_result = Ok(());
    let report = dispatch_batch(api, mode, rows, |msg| {
        if write_result.is_ok() {
            write_result = writeln!(out, "{}", msg);
        }
    })
    .await;
    write_result?;

    for (row, err) in &report.summary.failures {
        eprintln!("Row {}: {}", row.row_index, err.user_detail());
    }
    writeln!(out, "{}", report.completion_message())?;
    Ok(())
}
