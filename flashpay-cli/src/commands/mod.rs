//! CLI command implementations

pub mod activation;
pub mod banks;
pub mod logs;
pub mod lookup;
pub mod send;
pub mod shell;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use dialoguer::Password;
use flashpay_core::{EntryPoint, FlashPayContext, LogEvent, LoggingService, TransferTicket};
use indicatif::{ProgressBar, ProgressStyle};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let flashpay_dir = get_flashpay_dir();
    std::fs::create_dir_all(&flashpay_dir).ok()?;
    LoggingService::new(&flashpay_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<Arc<LoggingService>>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the FlashPay directory from environment or default
pub fn get_flashpay_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FLASHPAY_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .map(|home| home.join(".flashpay"))
            .unwrap_or_else(|| PathBuf::from(".flashpay"))
    }
}

/// Get or create the FlashPay context
pub fn get_context() -> Result<FlashPayContext> {
    let flashpay_dir = get_flashpay_dir();

    std::fs::create_dir_all(&flashpay_dir)
        .with_context(|| format!("Failed to create FlashPay directory: {:?}", flashpay_dir))?;

    FlashPayContext::new(&flashpay_dir, EntryPoint::Cli)
        .context("Failed to initialize FlashPay context")
}

/// Runtime for the async parts of the core (lookups, settlement)
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

/// Password from the flag, piped stdin, or an interactive prompt
pub fn read_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    if atty::isnt(atty::Stream::Stdin) {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }

    Ok(Password::new().with_prompt("Password").interact()?)
}

/// Wait for a transfer to settle behind a spinner
pub async fn wait_for_settlement(
    ticket: TransferTicket,
    show_spinner: bool,
) -> Result<flashpay_core::TransactionReceipt> {
    let spinner = if show_spinner {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        spinner.set_message(format!("Processing transfer {}...", ticket.id()));
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    } else {
        None
    };

    let receipt = ticket.settled().await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    Ok(receipt?)
}
