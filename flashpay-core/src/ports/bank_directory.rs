//! Bank directory port
//!
//! Resolves a destination account number to the account holder's display
//! name before a transfer is validated.

use async_trait::async_trait;

use crate::domain::result::Result;

/// External account-name lookup
///
/// Implementations must be deterministic for a given account number. The
/// caller only passes well-formed 10-digit numbers.
#[async_trait]
pub trait ExternalBankDirectory: Send + Sync {
    /// Directory name (e.g., "demo", "static")
    fn name(&self) -> &str;

    /// Look up the holder of `account_number`
    ///
    /// `Ok(None)` means the directory answered and has no such account;
    /// `Err` is reserved for the directory itself being unreachable.
    async fn lookup(&self, account_number: &str) -> Result<Option<String>>;
}
