//! FlashPay CLI - mobile wallet in your terminal

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use flashpay_core::LogEvent;

mod commands;
mod output;

use commands::{activation, banks, get_logger, log_event, logs, lookup, send, shell};

/// FlashPay - send money from a simulated mobile wallet
#[derive(Parser)]
#[command(name = "flashpay", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive wallet session
    Shell,

    /// Sign in and send a single transfer
    Send {
        /// Phone number to sign in with
        #[arg(long)]
        phone: String,
        /// Password (read from stdin or prompted when omitted)
        #[arg(long, env = "FLASHPAY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Destination bank
        #[arg(long)]
        bank: Option<String>,
        /// Destination account number (10 digits)
        #[arg(long)]
        account: Option<String>,
        /// Amount in naira
        #[arg(long)]
        amount: Option<String>,
        /// Pay the activation fee before sending
        #[arg(long)]
        activate: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported banks
    Banks {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show activation fee payment details
    Activation {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up the holder of an account number
    Lookup {
        /// Account number (10 digits)
        account_number: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage event logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Shell => "shell",
            Commands::Send { .. } => "send",
            Commands::Banks { .. } => "banks",
            Commands::Activation { .. } => "activation",
            Commands::Lookup { .. } => "lookup",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.name();

    // Closed again before the command opens its own connection
    {
        let logger = get_logger().map(Arc::new);
        log_event(&logger, LogEvent::new("command_executed").with_command(command));
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let logger = get_logger().map(Arc::new);
            log_event(
                &logger,
                LogEvent::new("command_failed")
                    .with_command(command)
                    .with_error(failure_code(&e)),
            );
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Shell => shell::run(),
        Commands::Send {
            phone,
            password,
            bank,
            account,
            amount,
            activate,
            json,
        } => send::run(send::SendArgs {
            phone,
            password,
            bank,
            account_number: account,
            amount,
            activate,
            json,
        }),
        Commands::Banks { json } => banks::run(json),
        Commands::Activation { json } => activation::run(json),
        Commands::Lookup {
            account_number,
            json,
        } => lookup::run(&account_number, json),
        Commands::Logs { command } => logs::run(command),
    }
}

/// Error kind for the event log; messages can quote amounts
fn failure_code(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<flashpay_core::Error>() {
        Some(flashpay_core::Error::Auth(_)) => "auth",
        Some(flashpay_core::Error::Activation(_)) => "activation",
        Some(flashpay_core::Error::Validation(_)) => "validation",
        Some(flashpay_core::Error::Concurrency(_)) => "concurrency",
        Some(flashpay_core::Error::Ledger(_)) => "ledger",
        Some(flashpay_core::Error::Directory(_)) => "directory",
        Some(_) => "internal",
        None => "cli",
    }
}
