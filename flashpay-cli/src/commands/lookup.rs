//! Lookup command - find the holder of an account number

use anyhow::Result;
use colored::Colorize;
use flashpay_core::OperationResult;

use super::{get_context, runtime};

pub fn run(account_number: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let rt = runtime()?;
    let result = rt.block_on(ctx.wallet_service.lookup_recipient(account_number));

    if json {
        let result: OperationResult<String> = result.into();
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let name = result?;
    println!("{} {}", "Account holder:".green(), name.bold());
    Ok(())
}
