//! Bank directory adapters
//!
//! - `DemoBankDirectory` answers every account number with a stable name
//!   derived from a hash of the number, so the same number always resolves
//!   to the same holder.
//! - `StaticBankDirectory` answers from an explicit table and reports
//!   everything else as unknown.

use std::collections::HashMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::result::Result;
use crate::ports::ExternalBankDirectory;

const DEMO_NAMES: &[&str] = &[
    "John Doe",
    "Jane Smith",
    "Ahmad Ibrahim",
    "Kemi Adebayo",
    "David Okafor",
];

/// Deterministic stand-in for a real name-enquiry service
#[derive(Debug, Clone, Default)]
pub struct DemoBankDirectory;

impl DemoBankDirectory {
    pub fn new() -> Self {
        Self
    }

    /// Pick the demo holder name for an account number
    pub fn name_for(account_number: &str) -> &'static str {
        let digest = Sha256::digest(account_number.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        let index = u64::from_be_bytes(prefix) % DEMO_NAMES.len() as u64;
        DEMO_NAMES[index as usize]
    }
}

#[async_trait]
impl ExternalBankDirectory for DemoBankDirectory {
    fn name(&self) -> &str {
        "demo"
    }

    async fn lookup(&self, account_number: &str) -> Result<Option<String>> {
        Ok(Some(Self::name_for(account_number).to_string()))
    }
}

/// Table-backed directory
#[derive(Debug, Clone, Default)]
pub struct StaticBankDirectory {
    accounts: HashMap<String, String>,
}

impl StaticBankDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account holder
    pub fn with_account(
        mut self,
        account_number: impl Into<String>,
        account_name: impl Into<String>,
    ) -> Self {
        self.accounts
            .insert(account_number.into(), account_name.into());
        self
    }
}

#[async_trait]
impl ExternalBankDirectory for StaticBankDirectory {
    fn name(&self) -> &str {
        "static"
    }

    async fn lookup(&self, account_number: &str) -> Result<Option<String>> {
        Ok(self.accounts.get(account_number).cloned())
    }
}
