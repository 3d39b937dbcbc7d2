//! Blob janitor CLI commands.

use std::time::Duration;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use studyhub_core::error::AppError;

/// Arguments for janitor commands
#[derive(Debug, Args)]
pub struct JanitorArgs {
    /// Janitor subcommand
    #[command(subcommand)]
    pub command: JanitorCommand,
}

/// Janitor subcommands
#[derive(Debug, Subcommand)]
pub enum JanitorCommand {
    /// Retry queued blob deletions once
    Sweep,
    /// Find blobs no file references
    Orphans {
        /// Ignore blobs younger than this many seconds
        #[arg(long, default_value = "3600")]
        min_age: u64,
        /// Delete the orphans instead of listing them
        #[arg(long)]
        delete: bool,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Queued deletions that ran out of retries
    Exhausted {
        /// Drop them from the queue (blobs are left in storage)
        #[arg(long)]
        purge: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct OrphanRow {
    path: String,
}

#[derive(Debug, Serialize, Tabled)]
struct ExhaustedRow {
    path: String,
    attempts: i64,
    last_error: String,
    queued_at: String,
}

/// Execute janitor commands
pub async fn execute(
    args: &JanitorArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    if let JanitorCommand::Orphans {
        delete: true,
        yes: false,
        ..
    } = &args.command
    {
        if !output::confirm("Delete every unreferenced blob?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let config = super::load_config(config_path)?;
    let (db, state) = super::build_state(config).await?;
    let janitor = &state.janitor;

    let result = match &args.command {
        JanitorCommand::Sweep => janitor.sweep().await.map(|report| match format {
            OutputFormat::Json => output::print_json(&report),
            OutputFormat::Table => {
                output::print_kv("Deleted", &report.deleted.to_string());
                output::print_kv("Failed", &report.failed.to_string());
                output::print_kv("Skipped", &report.skipped.to_string());
            }
        }),
        JanitorCommand::Exhausted { purge: true } => janitor.purge_exhausted().await.map(|n| {
            output::print_success(&format!("{n} exhausted deletion(s) purged"));
        }),
        JanitorCommand::Exhausted { purge: false } => janitor.exhausted().await.map(|entries| {
            let rows: Vec<ExhaustedRow> = entries
                .into_iter()
                .map(|e| ExhaustedRow {
                    path: e.path,
                    attempts: e.attempts,
                    last_error: e.last_error.unwrap_or_default(),
                    queued_at: e.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }),
        JanitorCommand::Orphans {
            min_age, delete, ..
        } => {
            let min_age = Duration::from_secs(*min_age);
            if *delete {
                janitor.collect_orphans(min_age).await.map(|removed| {
                    output::print_success(&format!("{removed} orphaned blob(s) removed"));
                })
            } else {
                janitor.find_orphans(min_age).await.map(|paths| {
                    let rows: Vec<OrphanRow> =
                        paths.into_iter().map(|path| OrphanRow { path }).collect();
                    output::print_list(&rows, format);
                })
            }
        }
    };

    db.close().await;
    result
}
