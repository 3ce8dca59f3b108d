//! Send command - sign in, send one transfer and wait for it to settle

use anyhow::Result;
use colored::Colorize;
use dialoguer::Input;
use flashpay_core::domain::money::format_naira;
use flashpay_core::{
    FlashPayContext, OperationResult, ReceiptStatus, SessionStore, TransactionReceipt,
    TransferRequest,
};

use super::{get_context, read_password, runtime, wait_for_settlement};
use crate::output;

pub struct SendArgs {
    pub phone: String,
    pub password: Option<String>,
    pub bank: Option<String>,
    pub account_number: Option<String>,
    pub amount: Option<String>,
    pub activate: bool,
    pub json: bool,
}

pub fn run(args: SendArgs) -> Result<()> {
    let ctx = get_context()?;
    let rt = runtime()?;

    let password = read_password(args.password)?;
    let session = ctx.new_session();
    session.login(&args.phone, &password)?;

    if args.activate {
        let user = ctx.activation_gate.pay_activation_fee(&session)?;
        if !args.json {
            output::success(&format!(
                "Wallet activated, balance {}",
                format_naira(user.balance)
            ));
        }
    }

    let bank = match args.bank {
        Some(b) => b,
        None => Input::new().with_prompt("Bank").interact_text()?,
    };
    let account_number = match args.account_number {
        Some(a) => a,
        None => Input::new().with_prompt("Account number").interact_text()?,
    };
    let amount = match args.amount {
        Some(a) => a,
        None => Input::new().with_prompt("Amount (₦)").interact_text()?,
    };

    let request = TransferRequest::new(bank, account_number, amount);
    let receipt = rt.block_on(transfer(&ctx, &session, request, args.json))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&OperationResult::ok(&receipt))?
        );
        return Ok(());
    }

    println!("{}", output::receipt_table(&receipt));
    match receipt.status {
        ReceiptStatus::Successful => {
            if let Some(user) = session.current_user() {
                println!(
                    "{} {}",
                    "Transfer complete. New balance:".green(),
                    format_naira(user.balance).bold()
                );
            }
        }
        _ => output::error("Transfer failed; your balance was not charged"),
    }

    Ok(())
}

/// Submit `request` and wait for it to settle
///
/// Settlement runs on the command's runtime, which is gone once the command
/// returns, so the transfer is always awaited here. A refused request is
/// reported and returned as an error in both output modes.
async fn transfer(
    ctx: &FlashPayContext,
    session: &SessionStore,
    request: TransferRequest,
    json: bool,
) -> Result<TransactionReceipt> {
    let ticket = match ctx.wallet_service.submit_transfer(session, request).await {
        Ok(ticket) => ticket,
        Err(e) => {
            if json {
                let result = OperationResult::<()>::from(&e);
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                for reason in e.validation_errors() {
                    output::error(&format!("  • {}", reason));
                }
            }
            return Err(e.into());
        }
    };

    wait_for_settlement(ticket, !json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashpay_core::adapters::{InstantSettlement, StaticBankDirectory};
    use flashpay_core::config::Config;
    use flashpay_core::Error;
    use std::sync::Arc;

    fn context() -> FlashPayContext {
        FlashPayContext::with_collaborators(
            Config::default(),
            Arc::new(StaticBankDirectory::new().with_account("1234567890", "Kemi Adebayo")),
            Arc::new(InstantSettlement),
            None,
        )
    }

    #[tokio::test]
    async fn test_transfer_returns_settled_receipt() {
        let ctx = context();
        let session = ctx.new_session();
        session.login("08000000000", "abcd").unwrap();

        let receipt = transfer(&ctx, &session, TransferRequest::new("UBA", "1234567890", "10"), true)
            .await
            .unwrap();
        assert_eq!(receipt.status, ReceiptStatus::Successful);
        assert!(receipt.status.is_terminal());
    }

    #[tokio::test]
    async fn test_refused_transfer_is_an_error_in_json_mode() {
        let ctx = context();
        let session = ctx.new_session();
        session.login("08000000000", "abcd").unwrap();

        let err = transfer(&ctx, &session, TransferRequest::default(), true)
            .await
            .unwrap_err();
        let core = err.downcast_ref::<Error>().unwrap();
        assert_eq!(core.validation_errors().len(), 4);
        assert!(ctx.wallet_service.history(&session).unwrap().is_empty());
    }
}
