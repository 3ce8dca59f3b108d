//! Activation command - show how to pay the activation fee

use anyhow::Result;
use colored::Colorize;
use flashpay_core::domain::money::format_naira;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let rail = ctx.activation_gate.payment_rail();
    let bonus = ctx.activation_gate.bonus();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "paymentRail": rail,
                "bonus": bonus,
            }))?
        );
        return Ok(());
    }

    println!("{}", "Wallet Activation".bold());
    println!();
    println!(
        "Send {} to the account below, then activate from `flashpay shell`",
        format_naira(rail.fee).bold()
    );
    println!("or with `flashpay send --activate`.");
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Account Number", rail.account_number.as_str()]);
    table.add_row(vec!["Account Name", rail.account_name.as_str()]);
    table.add_row(vec!["Bank", rail.bank_name.as_str()]);
    println!("{}", table);
    println!();
    output::info(&format!(
        "Activated wallets hold a balance of {}",
        format_naira(bonus)
    ));

    Ok(())
}
