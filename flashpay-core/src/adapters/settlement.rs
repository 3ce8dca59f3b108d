//! Settlement gateway adapters
//!
//! - `SimulatedSettlement` confirms every transfer after a fixed delay
//! - `InstantSettlement` confirms immediately
//! - `ManualSettlement` waits for someone to call `confirm` or `reject`

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use crate::domain::TransactionReceipt;
use crate::ports::{SettlementGateway, SettlementOutcome};

/// Default processing delay of the simulated payment network
pub const DEFAULT_SETTLEMENT_DELAY: Duration = Duration::from_millis(3000);

/// Confirms every transfer once `delay` has elapsed
#[derive(Debug, Clone)]
pub struct SimulatedSettlement {
    delay: Duration,
}

impl SimulatedSettlement {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedSettlement {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLEMENT_DELAY)
    }
}

#[async_trait]
impl SettlementGateway for SimulatedSettlement {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn settle(&self, _receipt: &TransactionReceipt) -> SettlementOutcome {
        tokio::time::sleep(self.delay).await;
        SettlementOutcome::Confirmed
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstantSettlement;

#[async_trait]
impl SettlementGateway for InstantSettlement {
    fn name(&self) -> &str {
        "instant"
    }

    async fn settle(&self, _receipt: &TransactionReceipt) -> SettlementOutcome {
        SettlementOutcome::Confirmed
    }
}

/// Settlement decided by hand
///
/// Decisions are queued and handed to pending settlements in arrival order,
/// so a decision may be pushed before the transfer it is meant for starts
/// waiting.
pub struct ManualSettlement {
    decisions: mpsc::UnboundedSender<SettlementOutcome>,
    queue: Mutex<mpsc::UnboundedReceiver<SettlementOutcome>>,
}

impl ManualSettlement {
    pub fn new() -> Self {
        let (decisions, queue) = mpsc::unbounded_channel();
        Self {
            decisions,
            queue: Mutex::new(queue),
        }
    }

    /// Confirm the next waiting transfer
    pub fn confirm(&self) {
        self.decide(SettlementOutcome::Confirmed);
    }

    /// Reject the next waiting transfer
    pub fn reject(&self, reason: impl Into<String>) {
        self.decide(SettlementOutcome::rejected(reason));
    }

    fn decide(&self, outcome: SettlementOutcome) {
        // The receiving half lives in `self`, so the channel is open.
        let _ = self.decisions.send(outcome);
    }
}

impl Default for ManualSettlement {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettlementGateway for ManualSettlement {
    fn name(&self) -> &str {
        "manual"
    }

    async fn settle(&self, _receipt: &TransactionReceipt) -> SettlementOutcome {
        let mut queue = self.queue.lock().await;
        queue
            .recv()
            .await
            .unwrap_or_else(|| SettlementOutcome::rejected("settlement channel closed"))
    }
}
