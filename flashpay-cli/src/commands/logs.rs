//! Logs command - view and manage wallet event logs

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;

use super::get_flashpay_dir;
use crate::output::{create_table, format_size};
use flashpay_core::{EntryPoint, LogEntry, LoggingService};

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent wallet events
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only failures
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete old events
    Clear {
        /// Delete events older than N days
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Only delete this event (e.g. transfer_rejected)
        #[arg(long)]
        event: Option<String>,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarise events and transfers
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Transfer outcomes as recorded in the event log
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
struct TransferSummary {
    submitted: u64,
    rejected: u64,
    settled: u64,
    failed: u64,
}

impl TransferSummary {
    fn from_counts(counts: &[(String, u64)]) -> Self {
        let mut summary = Self::default();
        for (event, n) in counts {
            match event.as_str() {
                "transfer_submitted" => summary.submitted += n,
                "transfer_rejected" => summary.rejected += n,
                "transfer_settled" => summary.settled += n,
                "transfer_failed" => summary.failed += n,
                _ => {}
            }
        }
        summary
    }

    /// Submitted transfers with no outcome logged yet
    fn unsettled(&self) -> u64 {
        self.submitted.saturating_sub(self.settled + self.failed)
    }
}

fn open_logs() -> Result<LoggingService> {
    let flashpay_dir = get_flashpay_dir();
    std::fs::create_dir_all(&flashpay_dir)?;
    LoggingService::new(&flashpay_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
}

fn format_timestamp(timestamp_ms: i64) -> String {
    use chrono::{Local, TimeZone};
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

fn print_entries(entries: Vec<LogEntry>) {
    let mut table = create_table();
    table.set_header(vec!["Time", "From", "Event", "Receipt / command", "Code"]);

    for entry in entries {
        let reference = entry
            .reference
            .or(entry.command)
            .unwrap_or_default();
        let code = entry
            .error_message
            .map(|code| code.red().to_string())
            .unwrap_or_default();
        table.add_row(vec![
            format_timestamp(entry.timestamp),
            entry.entry_point,
            entry.event,
            reference,
            code,
        ]);
    }

    println!("{}", table);
}

pub fn run(command: LogsCommands) -> Result<()> {
    match command {
        LogsCommands::List { limit, errors, json } => {
            let logs = open_logs()?;
            let entries = if errors {
                logs.get_errors(limit)?
            } else {
                logs.get_recent(limit)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No events recorded yet.");
            } else {
                print_entries(entries);
            }
        }
        LogsCommands::Clear {
            older_than_days,
            event,
            force,
            json,
        } => {
            let logs = open_logs()?;
            let cutoff_ms = chrono::Utc::now().timestamp_millis()
                - (older_than_days as i64 * 24 * 60 * 60 * 1000);
            let what = event.as_deref().unwrap_or("all");

            if !force && !json {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete {} events older than {} days?",
                        what, older_than_days
                    ))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let deleted = match &event {
                Some(event) => logs.delete_event_before(event, cutoff_ms)?,
                None => logs.delete_before(cutoff_ms)?,
            };
            let remaining = logs.count()?;

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "deleted": deleted,
                        "event": event,
                        "remaining": remaining
                    })
                );
            } else {
                println!("Deleted {} {} events, {} remaining", deleted, what, remaining);
            }
        }
        LogsCommands::Stats { json } => {
            let logs = open_logs()?;
            let counts = logs.event_counts()?;
            let transfers = TransferSummary::from_counts(&counts);
            let total: u64 = counts.iter().map(|(_, n)| n).sum();
            let db_path = logs.db_path().map(|p| p.to_path_buf()).unwrap_or_default();
            let size_bytes = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

            if json {
                let events: serde_json::Map<String, serde_json::Value> = counts
                    .iter()
                    .map(|(event, n)| (event.clone(), (*n).into()))
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "total_entries": total,
                        "events": events,
                        "transfers": transfers,
                        "database_path": db_path.to_string_lossy(),
                        "database_size_bytes": size_bytes
                    })
                );
                return Ok(());
            }

            println!("{}", "Transfers".bold());
            println!("  Submitted: {}", transfers.submitted);
            println!("  Settled:   {}", transfers.settled.to_string().green());
            println!("  Failed:    {}", transfers.failed.to_string().red());
            println!("  Rejected:  {}", transfers.rejected);
            if transfers.unsettled() > 0 {
                println!("  Unsettled: {}", transfers.unsettled().to_string().yellow());
            }
            println!();

            if !counts.is_empty() {
                let mut table = create_table();
                table.set_header(vec!["Event", "Count"]);
                for (event, n) in &counts {
                    table.add_row(vec![event.clone(), n.to_string()]);
                }
                println!("{}", table);
            }
            println!("{} events in {} ({})", total, db_path.display(), format_size(size_bytes));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> Vec<(String, u64)> {
        pairs.iter().map(|(e, n)| (e.to_string(), *n)).collect()
    }

    #[test]
    fn test_transfer_summary() {
        let summary = TransferSummary::from_counts(&counts(&[
            ("transfer_submitted", 5),
            ("transfer_settled", 3),
            ("transfer_failed", 1),
            ("transfer_rejected", 2),
            ("session_login", 7),
        ]));
        assert_eq!(
            summary,
            TransferSummary {
                submitted: 5,
                rejected: 2,
                settled: 3,
                failed: 1,
            }
        );
        assert_eq!(summary.unsettled(), 1);
    }

    #[test]
    fn test_summary_after_partial_clear() {
        // Submissions cleared but outcomes kept
        let summary = TransferSummary::from_counts(&counts(&[("transfer_settled", 4)]));
        assert_eq!(summary.unsettled(), 0);
        assert_eq!(TransferSummary::from_counts(&[]), TransferSummary::default());
    }
}
