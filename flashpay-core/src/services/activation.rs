//! Activation gate - one-time fee in exchange for a bonus balance
//!
//! The fee is paid by hand into the account described by the payment rail.
//! Nothing here can see that payment: calling `pay_activation_fee` is the
//! confirmation.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::result::{ActivationError, Result};
use crate::domain::{PaymentRail, User};
use crate::services::ledger::LedgerEngine;
use crate::services::logging::{record, LogEvent, LoggingService};
use crate::services::session::SessionStore;

pub struct ActivationGate {
    ledger: Arc<LedgerEngine>,
    bonus: Decimal,
    payment_rail: PaymentRail,
    logger: Option<Arc<LoggingService>>,
}

impl ActivationGate {
    pub fn new(ledger: Arc<LedgerEngine>, bonus: Decimal, payment_rail: PaymentRail) -> Self {
        Self {
            ledger,
            bonus,
            payment_rail,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Option<Arc<LoggingService>>) -> Self {
        self.logger = logger;
        self
    }

    /// Where the human should send the fee
    pub fn payment_rail(&self) -> &PaymentRail {
        &self.payment_rail
    }

    /// Balance an activated wallet is set to
    pub fn bonus(&self) -> Decimal {
        self.bonus
    }

    /// Activate the signed-in wallet
    ///
    /// The balance is replaced by the bonus, not topped up. Calling this
    /// again resets the balance to the bonus again.
    pub fn pay_activation_fee(&self, session: &SessionStore) -> Result<User> {
        let Some(wallet) = session.wallet() else {
            record(
                &self.logger,
                LogEvent::new("activation_paid")
                    .with_session(session.session_id())
                    .with_error(ActivationError::NotAuthenticated.to_string()),
            );
            return Err(ActivationError::NotAuthenticated.into());
        };

        let user = wallet.update(|user| {
            self.ledger.post(user, self.bonus)?;
            user.has_activated = true;
            user.is_connected = true;
            Ok(user.clone())
        })?;

        record(
            &self.logger,
            LogEvent::new("activation_paid").with_session(session.session_id()),
        );
        Ok(user)
    }
}
