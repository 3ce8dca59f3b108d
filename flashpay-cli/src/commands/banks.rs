//! Banks command - list banks a transfer can go to

use anyhow::Result;
use colored::Colorize;
use flashpay_core::domain::SUPPORTED_BANKS;

pub fn run(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(SUPPORTED_BANKS)?);
        return Ok(());
    }

    println!("{}", "Supported Banks".bold());
    for bank in SUPPORTED_BANKS {
        println!("  • {}", bank);
    }

    Ok(())
}
