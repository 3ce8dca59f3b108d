//! Transaction recorder - receipts, in-flight tracking and settlement
//!
//! A committed transfer gets a Pending receipt right away. Settlement then
//! runs on its own Tokio task and moves the receipt to Successful or Failed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::domain::result::{ConcurrencyError, Error, Result};
use crate::domain::{ReceiptId, ReceiptStatus, TransactionReceipt, ValidTransfer};
use crate::ports::{SettlementGateway, SettlementOutcome};
use crate::services::ledger::{LedgerEngine, Wallet};
use crate::services::logging::{record, LogEvent, LoggingService};

/// Hands out receipt ids based on the wall clock in milliseconds
///
/// Two ids taken in the same millisecond (or after the clock stepped back)
/// still come out strictly increasing.
#[derive(Debug, Default)]
pub struct ReceiptIdGenerator {
    last: AtomicU64,
}

impl ReceiptIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> ReceiptId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        ReceiptId::new(now.max(previous + 1))
    }
}

#[derive(Debug, Default)]
struct UserBook {
    history: Vec<TransactionReceipt>,
    in_flight: Option<ReceiptId>,
    /// Owner signed out; dropped once nothing is settling
    closed: bool,
}

type Books = Arc<Mutex<HashMap<Uuid, UserBook>>>;

fn lock(books: &Books) -> MutexGuard<'_, HashMap<Uuid, UserBook>> {
    books.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A committed transfer: its Pending receipt and the settlement in progress
#[derive(Debug)]
pub struct TransferTicket {
    receipt: TransactionReceipt,
    handle: JoinHandle<TransactionReceipt>,
}

impl TransferTicket {
    /// The receipt as it was at commit time
    pub fn receipt(&self) -> &TransactionReceipt {
        &self.receipt
    }

    pub fn id(&self) -> ReceiptId {
        self.receipt.id
    }

    /// Wait for settlement and return the terminal receipt
    ///
    /// Dropping the ticket instead does not cancel anything.
    pub async fn settled(self) -> Result<TransactionReceipt> {
        self.handle
            .await
            .map_err(|e| Error::internal(format!("Settlement task failed: {}", e)))
    }
}

pub struct TransactionRecorder {
    ledger: Arc<LedgerEngine>,
    settlement: Arc<dyn SettlementGateway>,
    ids: ReceiptIdGenerator,
    books: Books,
    timeout: Option<Duration>,
    logger: Option<Arc<LoggingService>>,
}

impl TransactionRecorder {
    pub fn new(ledger: Arc<LedgerEngine>, settlement: Arc<dyn SettlementGateway>) -> Self {
        Self {
            ledger,
            settlement,
            ids: ReceiptIdGenerator::new(),
            books: Arc::new(Mutex::new(HashMap::new())),
            timeout: None,
            logger: None,
        }
    }

    /// Fail settlements that take longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_logger(mut self, logger: Option<Arc<LoggingService>>) -> Self {
        self.logger = logger;
        self
    }

    pub fn settlement_name(&self) -> &str {
        self.settlement.name()
    }

    /// Record `transfer` as Pending and start settling it
    ///
    /// Must be called from within a Tokio runtime.
    pub fn commit(&self, wallet: &Wallet, transfer: ValidTransfer) -> Result<TransferTicket> {
        let user_id = wallet.user_id();

        let receipt = {
            let mut books = lock(&self.books);
            let book = books.entry(user_id).or_default();
            if let Some(pending) = book.in_flight {
                return Err(ConcurrencyError::TransferInProgress(pending).into());
            }

            let receipt = TransactionReceipt::pending_transfer(
                self.ids.next_id(),
                user_id,
                transfer.amount(),
                transfer.recipient().clone(),
            );
            book.in_flight = Some(receipt.id);
            book.history.push(receipt.clone());
            receipt
        };

        let task = SettlementTask {
            ledger: self.ledger.clone(),
            settlement: self.settlement.clone(),
            books: self.books.clone(),
            timeout: self.timeout,
            logger: self.logger.clone(),
            wallet: wallet.clone(),
        };
        let handle = tokio::spawn(task.run(receipt.clone()));

        Ok(TransferTicket { receipt, handle })
    }

    /// Receipts of a user, oldest first
    pub fn history(&self, user_id: Uuid) -> Vec<TransactionReceipt> {
        lock(&self.books)
            .get(&user_id)
            .map(|book| book.history.clone())
            .unwrap_or_default()
    }

    pub fn receipt(&self, user_id: Uuid, id: ReceiptId) -> Option<TransactionReceipt> {
        lock(&self.books)
            .get(&user_id)
            .and_then(|book| book.history.iter().find(|r| r.id == id).cloned())
    }

    /// Id of the user's Pending transfer, if one is settling
    pub fn in_flight(&self, user_id: Uuid) -> Option<ReceiptId> {
        lock(&self.books).get(&user_id).and_then(|book| book.in_flight)
    }

    /// Forget a signed-out user's receipts
    ///
    /// A transfer still settling keeps the book alive until it is terminal.
    pub fn close_book(&self, user_id: Uuid) {
        let mut books = lock(&self.books);
        match books.get_mut(&user_id) {
            Some(book) if book.in_flight.is_some() => book.closed = true,
            Some(_) => {
                books.remove(&user_id);
            }
            None => {}
        }
    }

    /// Number of users whose receipts are held
    pub fn open_books(&self) -> usize {
        lock(&self.books).len()
    }
}

struct SettlementTask {
    ledger: Arc<LedgerEngine>,
    settlement: Arc<dyn SettlementGateway>,
    books: Books,
    timeout: Option<Duration>,
    logger: Option<Arc<LoggingService>>,
    wallet: Wallet,
}

impl SettlementTask {
    async fn run(self, mut receipt: TransactionReceipt) -> TransactionReceipt {
        let settle = self.settlement.settle(&receipt);
        let (outcome, mut failure) = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, settle).await {
                Ok(outcome) => (outcome, "rejected"),
                Err(_) => (
                    SettlementOutcome::rejected(format!(
                        "Settlement timed out after {}ms",
                        limit.as_millis()
                    )),
                    "timeout",
                ),
            },
            None => (settle.await, "rejected"),
        };

        // The debit and the receipt update happen under the books lock so
        // history never shows a debited transfer as Pending.
        {
            let mut books = lock(&self.books);
            match outcome {
                SettlementOutcome::Confirmed => {
                    match self.ledger.apply_delta(&self.wallet, -receipt.amount) {
                        Ok(_) => receipt.mark_successful(),
                        Err(e) => {
                            failure = "overdraft";
                            receipt.mark_failed(e.to_string());
                        }
                    }
                }
                SettlementOutcome::Rejected { reason } => receipt.mark_failed(reason),
            }

            let mut finished = false;
            if let Some(book) = books.get_mut(&receipt.user_id) {
                if let Some(entry) = book.history.iter_mut().find(|r| r.id == receipt.id) {
                    *entry = receipt.clone();
                }
                if book.in_flight == Some(receipt.id) {
                    book.in_flight = None;
                }
                finished = book.closed && book.in_flight.is_none();
            }
            if finished {
                books.remove(&receipt.user_id);
            }
        }

        // Failure reasons may quote balances, so only the kind is logged.
        let event = match receipt.status {
            ReceiptStatus::Successful => LogEvent::new("transfer_settled"),
            _ => LogEvent::new("transfer_failed").with_error(failure),
        };
        record(&self.logger, event.with_reference(receipt.id));

        receipt
    }
}
