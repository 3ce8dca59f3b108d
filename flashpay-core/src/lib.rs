//! FlashPay Core - business logic for the FlashPay mobile wallet
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (User, TransferRequest, TransactionReceipt, etc.)
//! - **ports**: Trait definitions for external collaborators (bank directory, settlement)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (demo directory, simulated settlement, etc.)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;
pub mod log_migrations;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::{DemoBankDirectory, SimulatedSettlement};
use config::Config;
use ports::{ExternalBankDirectory, SettlementGateway};
use services::*;

// Re-export commonly used types at crate root
pub use domain::{
    PaymentRail, ReceiptId, ReceiptStatus, Recipient, TransactionReceipt, TransferRequest, User,
};
pub use domain::result::{Error, OperationResult};
pub use services::{
    EntryPoint, LogEntry, LogEvent, LoggingService, SessionState, SessionStore, TransferTicket,
};

/// Main context for FlashPay operations
///
/// Holds the configuration, the shared collaborators and every service.
/// Sessions are created from it but owned by the caller.
pub struct FlashPayContext {
    pub config: Config,
    pub logger: Option<Arc<LoggingService>>,
    pub ledger: Arc<LedgerEngine>,
    pub activation_gate: ActivationGate,
    pub validator: Arc<TransferValidator>,
    pub recorder: Arc<TransactionRecorder>,
    pub wallet_service: WalletService,
}

impl FlashPayContext {
    /// Create a context backed by `flashpay_dir`
    ///
    /// Reads settings.json, opens logs.duckdb and wires the demo bank
    /// directory with simulated settlement.
    pub fn new(flashpay_dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        let config = Config::load(flashpay_dir)?;
        let logger = LoggingService::new(flashpay_dir, entry_point, env!("CARGO_PKG_VERSION"))
            .context("Failed to open logs database")?;

        let settlement = SimulatedSettlement::new(config.settlement_delay);
        Ok(Self::with_collaborators(
            config,
            Arc::new(DemoBankDirectory::new()),
            Arc::new(settlement),
            Some(Arc::new(logger)),
        ))
    }

    /// Create a context around injected collaborators
    pub fn with_collaborators(
        config: Config,
        directory: Arc<dyn ExternalBankDirectory>,
        settlement: Arc<dyn SettlementGateway>,
        logger: Option<Arc<LoggingService>>,
    ) -> Self {
        let ledger = Arc::new(LedgerEngine::new());

        let activation_gate = ActivationGate::new(
            Arc::clone(&ledger),
            config.activation_bonus,
            config.payment_rail.clone(),
        )
        .with_logger(logger.clone());
        let validator = Arc::new(TransferValidator::new(directory));
        let recorder = Arc::new(
            TransactionRecorder::new(Arc::clone(&ledger), settlement)
                .with_timeout(config.settlement_timeout)
                .with_logger(logger.clone()),
        );
        let wallet_service = WalletService::new(
            Arc::clone(&ledger),
            Arc::clone(&validator),
            Arc::clone(&recorder),
        )
        .with_enforce_activation(config.enforce_activation)
        .with_logger(logger.clone());

        Self {
            config,
            logger,
            ledger,
            activation_gate,
            validator,
            recorder,
            wallet_service,
        }
    }

    /// Start an anonymous session
    ///
    /// Receipts of a user are dropped when they sign out of it.
    pub fn new_session(&self) -> SessionStore {
        SessionStore::new(self.config.starter_balance)
            .with_recorder(Arc::clone(&self.recorder))
            .with_logger(self.logger.clone())
    }
}
