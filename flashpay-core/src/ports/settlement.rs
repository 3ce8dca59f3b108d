//! Settlement port
//!
//! Settlement is the asynchronous step that turns a Pending transfer into a
//! terminal one. The recorder awaits the gateway and never looks behind it.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::TransactionReceipt;

/// What the payment side said about a transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum SettlementOutcome {
    Confirmed,
    Rejected { reason: String },
}

impl SettlementOutcome {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Awaitable confirmation collaborator
///
/// Production and tests differ only in which gateway is injected.
#[async_trait]
pub trait SettlementGateway: Send + Sync {
    /// Gateway name (e.g., "simulated", "manual")
    fn name(&self) -> &str;

    /// Wait until the transfer behind `receipt` is confirmed or rejected
    async fn settle(&self, receipt: &TransactionReceipt) -> SettlementOutcome;
}
