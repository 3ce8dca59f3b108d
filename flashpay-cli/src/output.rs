//! Output formatting utilities

use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use flashpay_core::domain::money::format_naira;
use flashpay_core::{ReceiptStatus, TransactionReceipt, User};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

pub fn status_label(status: ReceiptStatus) -> ColoredString {
    match status {
        ReceiptStatus::Pending => status.to_string().yellow(),
        ReceiptStatus::Successful => status.to_string().green(),
        ReceiptStatus::Failed => status.to_string().red(),
    }
}

/// Key-value table for a single receipt
pub fn receipt_table(receipt: &TransactionReceipt) -> Table {
    let mut table = create_table();
    table.add_row(vec!["Reference".to_string(), receipt.id.to_string()]);
    table.add_row(vec!["Amount".to_string(), format_naira(receipt.amount)]);
    table.add_row(vec![
        "Recipient".to_string(),
        receipt.recipient.account_name.clone(),
    ]);
    table.add_row(vec![
        "Account".to_string(),
        format!(
            "{} ({})",
            receipt.recipient.account_number, receipt.recipient.bank_name
        ),
    ]);
    table.add_row(vec![
        "Date".to_string(),
        receipt.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]);
    table.add_row(vec!["Status".to_string(), status_label(receipt.status).to_string()]);
    if let Some(reason) = &receipt.failure_reason {
        table.add_row(vec!["Reason".to_string(), reason.clone()]);
    }
    table
}

/// One row per receipt, newest first
pub fn history_table(receipts: &[TransactionReceipt]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Reference", "Recipient", "Bank", "Amount", "Status"]);
    for receipt in receipts.iter().rev() {
        table.add_row(vec![
            receipt.id.to_string(),
            receipt.recipient.account_name.clone(),
            receipt.recipient.bank_name.clone(),
            format_naira(receipt.amount),
            status_label(receipt.status).to_string(),
        ]);
    }
    table
}

pub fn print_user(user: &User) {
    let state = if user.has_activated {
        "activated".green()
    } else {
        "not activated".yellow()
    };
    println!("  Phone: {}", user.phone_number);
    println!("  Balance: {}", format_naira(user.balance).bold());
    println!("  Wallet: {}", state);
}
