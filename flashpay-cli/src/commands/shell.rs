//! Shell command - interactive wallet session
//!
//! Walks through the same screens as the mobile app: sign in, activation,
//! send money and transaction history. Everything lives in memory and is
//! gone when the shell exits.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Confirm, Input, Password, Select};
use flashpay_core::domain::money::format_naira;
use flashpay_core::domain::SUPPORTED_BANKS;
use flashpay_core::{FlashPayContext, SessionState, SessionStore, TransferRequest};
use tokio::runtime::Runtime;

use super::{get_context, runtime, wait_for_settlement};
use crate::output;

pub fn run() -> Result<()> {
    let ctx = get_context()?;
    let rt = runtime()?;
    let session = ctx.new_session();

    println!("{}", "FlashPay".bold());
    println!();

    loop {
        let keep_going = match session.state() {
            SessionState::Anonymous => signed_out_menu(&session)?,
            SessionState::Unactivated | SessionState::Activated => {
                signed_in_menu(&ctx, &rt, &session)?
            }
        };
        if !keep_going {
            break;
        }
        println!();
    }

    Ok(())
}

fn signed_out_menu(session: &SessionStore) -> Result<bool> {
    let choice = Select::new()
        .with_prompt("Welcome")
        .items(&["Login", "Register", "Quit"])
        .default(0)
        .interact()?;
    if choice == 2 {
        return Ok(false);
    }

    let phone: String = Input::new().with_prompt("Phone number").interact_text()?;
    let password = Password::new().with_prompt("Password").interact()?;

    let result = if choice == 0 {
        session.login(&phone, &password)
    } else {
        session.register(&phone, &password)
    };

    match result {
        Ok(user) => {
            output::success("Signed in");
            output::print_user(&user);
            if !user.has_activated {
                output::warning("Pay the activation fee to start sending money");
            }
        }
        Err(e) => output::error(&e.to_string()),
    }
    Ok(true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Send,
    History,
    Activate,
    Lookup,
    Logout,
    Quit,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Send => "Send money",
            Action::History => "Transaction history",
            Action::Activate => "Activate wallet",
            Action::Lookup => "Look up account",
            Action::Logout => "Logout",
            Action::Quit => "Quit",
        }
    }
}

/// Menu for a signed-in user; unactivated wallets land on activation first
fn menu_for(state: SessionState) -> Vec<Action> {
    let first = match state {
        SessionState::Unactivated => [Action::Activate, Action::Send],
        _ => [Action::Send, Action::Activate],
    };
    let mut actions = first.to_vec();
    actions.extend([Action::History, Action::Lookup, Action::Logout, Action::Quit]);
    actions
}

fn signed_in_menu(ctx: &FlashPayContext, rt: &Runtime, session: &SessionStore) -> Result<bool> {
    let Some(user) = session.current_user() else {
        return Ok(true);
    };

    println!(
        "Balance: {}{}",
        format_naira(user.balance).bold(),
        if user.has_activated {
            String::new()
        } else {
            format!("  {}", "(not activated)".yellow())
        }
    );

    let actions = menu_for(session.state());
    let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
    let choice = Select::new().items(&labels).default(0).interact()?;

    match actions[choice] {
        Action::Send => send_money(ctx, rt, session)?,
        Action::History => {
            let history = ctx.wallet_service.history(session)?;
            if history.is_empty() {
                println!("No transactions yet.");
            } else {
                println!("{}", output::history_table(&history));
            }
        }
        Action::Activate => activate(ctx, session)?,
        Action::Lookup => {
            let account_number: String =
                Input::new().with_prompt("Account number").interact_text()?;
            match rt.block_on(ctx.wallet_service.lookup_recipient(&account_number)) {
                Ok(name) => println!("{} {}", "Account holder:".green(), name.bold()),
                Err(e) => output::error(&e.to_string()),
            }
        }
        Action::Logout => {
            session.logout();
            output::info("Signed out");
        }
        Action::Quit => return Ok(false),
    }

    Ok(true)
}

fn activate(ctx: &FlashPayContext, session: &SessionStore) -> Result<()> {
    let rail = ctx.activation_gate.payment_rail();
    println!(
        "Pay {} to {} - {} ({})",
        format_naira(rail.fee).bold(),
        rail.account_number,
        rail.account_name,
        rail.bank_name
    );

    let paid = Confirm::new()
        .with_prompt("I have made the payment")
        .default(false)
        .interact()?;
    if !paid {
        return Ok(());
    }

    match ctx.activation_gate.pay_activation_fee(session) {
        Ok(user) => {
            output::success("Wallet activated");
            output::print_user(&user);
        }
        Err(e) => output::error(&e.to_string()),
    }
    Ok(())
}

fn send_money(ctx: &FlashPayContext, rt: &Runtime, session: &SessionStore) -> Result<()> {
    let bank = Select::new()
        .with_prompt("Bank")
        .items(SUPPORTED_BANKS)
        .default(0)
        .interact()?;
    let account_number: String = Input::new().with_prompt("Account number").interact_text()?;
    let amount: String = Input::new().with_prompt("Amount (₦)").interact_text()?;

    let request = TransferRequest::new(SUPPORTED_BANKS[bank], account_number, amount);
    let ticket = match rt.block_on(ctx.wallet_service.submit_transfer(session, request)) {
        Ok(ticket) => ticket,
        Err(e) => {
            let reasons = e.validation_errors();
            if reasons.is_empty() {
                output::error(&e.to_string());
            } else {
                output::error("Transfer not sent:");
                for reason in reasons {
                    output::error(&format!("  • {}", reason));
                }
            }
            return Ok(());
        }
    };

    let recipient = &ticket.receipt().recipient;
    output::info(&format!(
        "Sending {} to {}",
        format_naira(ticket.receipt().amount),
        recipient.account_name
    ));

    let receipt = rt.block_on(wait_for_settlement(ticket, true))?;
    println!("{}", output::receipt_table(&receipt));
    Ok(())
}
