//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod bank;
pub mod money;
mod receipt;
pub mod result;
mod transfer;
mod user;

pub use bank::{canonical_bank_name, PaymentRail, SUPPORTED_BANKS};
pub use receipt::{ReceiptId, ReceiptStatus, TransactionKind, TransactionReceipt};
pub use transfer::{is_account_number, parse_amount, Recipient, TransferRequest, ValidTransfer};
pub use user::User;
