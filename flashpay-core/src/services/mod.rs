//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on one step of the wallet flow.

mod activation;
pub mod ledger;
pub mod logging;
mod recorder;
mod session;
mod validator;
mod wallet;

pub use activation::ActivationGate;
pub use ledger::{LedgerEngine, Wallet};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use recorder::{ReceiptIdGenerator, TransactionRecorder, TransferTicket};
pub use session::{SessionState, SessionStore};
pub use validator::TransferValidator;
pub use wallet::WalletService;
