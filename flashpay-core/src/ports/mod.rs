//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external collaborators. The core domain
//! depends only on these traits, not on concrete implementations.

mod bank_directory;
mod settlement;

pub use bank_directory::ExternalBankDirectory;
pub use settlement::{SettlementGateway, SettlementOutcome};
