//! Adapter implementations
//!
//! Adapters implement the port traits:
//! - Demo and table-backed directories for ExternalBankDirectory
//! - Simulated, instant and manual gateways for SettlementGateway

pub mod directory;
pub mod settlement;

pub use directory::{DemoBankDirectory, StaticBankDirectory};
pub use settlement::{InstantSettlement, ManualSettlement, SimulatedSettlement};
