// src/cli/mod.rs
// Headless commands that talk to the same backend as the window.

pub mod list_rows;
pub mod preview_row;
pub mod run_batch;
pub mod upload_csv;

use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::gateway::{GatewayError, HttpMailApi, MailApi};
use crate::outreach::batch::BatchError;
use crate::outreach::definitions::BatchMode;
use crate::settings::AppSettings;

#[derive(Parser, Debug)]
#[command(name = "sheet_mailer")]
#[command(about = "Sheet Mailer - draft or send outreach emails from sheet rows", long_about = None)]
pub struct Cli {
    /// Backend base URL, e.g. http://localhost:8000 (overrides settings and environment)
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Fetch the rows and print them
    List,

    /// Print the rendered email for one row
    Preview {
        /// Row index as reported by the backend
        #[arg(long)]
        row: i64,
    },

    /// Save the selected rows as drafts
    Draft(BatchArgs),

    /// Send the selected rows directly
    Send {
        #[command(flatten)]
        batch: BatchArgs,
        /// Skip the confirmation requirement
        #[arg(long)]
        yes: bool,
    },

    /// Upload a CSV that replaces the backend's rows
    Upload {
        /// Path to the CSV file
        path: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchArgs {
    /// Comma separated row indices to select
    #[arg(long, value_delimiter = ',', value_name = "INDICES")]
    pub rows: Vec<i64>,
    /// Select every row
    #[arg(long)]
    pub all: bool,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Batch(#[from] BatchError),
    /// Already phrased for the user, printed as is.
    #[error("{0}")]
    Upload(String),
    #[error("Unknown row index(es): {0:?}")]
    UnknownRows(Vec<i64>),
    #[error("Refusing to send without --yes while confirm_before_send is enabled")]
    ConfirmationRequired,
    #[error("Failed to start async runtime: {0}")]
    Runtime(String),
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Runs one command to completion on a fresh tokio runtime, printing to stdout.
pub fn run(command: Commands, settings: &AppSettings) -> Result<(), CliError> {
    let api: Arc<dyn MailApi> = Arc::new(HttpMailApi::new(&settings.api_base_url)?);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;
    let mut stdout = std::io::stdout();
    runtime.block_on(execute(command, api, settings.confirm_before_send, &mut stdout))
}

pub async fn execute<W: Write>(
    command: Commands,
    api: Arc<dyn MailApi>,
    confirm_before_send: bool,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        Commands::List => list_rows::run(api.as_ref(), out).await,
        Commands::Preview { row } => preview_row::run(api.as_ref(), row, out).await,
        Commands::Draft(batch) => run_batch::run(api, BatchMode::Draft, &batch, out).await,
        Commands::Send { batch, yes } => {
            if confirm_before_send && !yes {
                return Err(CliError::ConfirmationRequired);
            }
            run_batch::run(api, BatchMode::Send, &batch, out).await
        }
        Commands::Upload { path } => upload_csv::run(api.as_ref(), &path, out).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::stub::StubMailApi;

    #[test]
    fn parses_global_base_and_row_list() {
        let cli = Cli::parse_from(["sheet_mailer", "send", "--rows", "0,2", "--api-base", "http://h:1"]);
        assert_eq!(cli.api_base.as_deref(), Some("http://h:1"));
        assert_eq!(
            cli.command,
            Some(Commands::Send {
                batch: BatchArgs { rows: vec![0, 2], all: false },
                yes: false,
            })
        );

        let bare = Cli::parse_from(["sheet_mailer"]);
        assert!(bare.command.is_none());
    }

    #[tokio::test]
    async fn send_without_yes_makes_no_calls() {
        let stub = Arc::new(StubMailApi::new());
        let mut out = Vec::new();
        let err = execute(
            Commands::Send { batch: BatchArgs { rows: vec![0], all: false }, yes: false },
            stub.clone(),
            true,
            &mut out,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::ConfirmationRequired));
        assert!(stub.calls().is_empty());
    }
}
