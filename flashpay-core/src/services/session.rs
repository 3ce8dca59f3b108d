//! Session store - the authenticated identity of one session
//!
//! A `SessionStore` is an explicitly owned value. Several can live side by
//! side (one per connected client), each holding at most one user.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::result::{AuthError, Result};
use crate::domain::User;
use crate::services::ledger::Wallet;
use crate::services::logging::{record, LogEvent, LoggingService};
use crate::services::recorder::TransactionRecorder;

const MIN_PASSWORD_CHARS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    Anonymous,
    Unactivated,
    Activated,
}

/// Owns the current user of a session
pub struct SessionStore {
    session_id: Uuid,
    starter_balance: Decimal,
    current: RwLock<Option<Wallet>>,
    recorder: Option<Arc<TransactionRecorder>>,
    logger: Option<Arc<LoggingService>>,
}

impl SessionStore {
    /// `starter_balance` is what a login starts with; registration starts at zero
    pub fn new(starter_balance: Decimal) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            starter_balance,
            current: RwLock::new(None),
            recorder: None,
            logger: None,
        }
    }

    /// Drop a user's receipts from `recorder` when they sign out
    pub fn with_recorder(mut self, recorder: Arc<TransactionRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn with_logger(mut self, logger: Option<Arc<LoggingService>>) -> Self {
        self.logger = logger;
        self
    }

    /// Opaque id used to correlate log events of this session
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Sign in, replacing whoever was signed in before
    pub fn login(&self, phone_number: &str, password: &str) -> Result<User> {
        self.start("session_login", phone_number, password, self.starter_balance)
    }

    /// Create a new wallet with a zero balance and sign in to it
    pub fn register(&self, phone_number: &str, password: &str) -> Result<User> {
        self.start("session_register", phone_number, password, Decimal::ZERO)
    }

    fn start(
        &self,
        event: &str,
        phone_number: &str,
        password: &str,
        balance: Decimal,
    ) -> Result<User> {
        let phone_number = phone_number.trim();
        if phone_number.is_empty() || password.chars().count() < MIN_PASSWORD_CHARS {
            let err = AuthError::InvalidCredentials;
            record(
                &self.logger,
                LogEvent::new(event)
                    .with_session(self.session_id)
                    .with_error(err.to_string()),
            );
            return Err(err.into());
        }

        let user = User::new(phone_number, balance);
        let previous = self.slot_mut().replace(Wallet::new(user.clone()));
        if let Some(previous) = previous {
            self.close(&previous);
        }

        record(&self.logger, LogEvent::new(event).with_session(self.session_id));
        Ok(user)
    }

    /// Sign out; always succeeds
    ///
    /// A transfer still settling keeps its own handle on the old wallet.
    pub fn logout(&self) {
        let previous = self.slot_mut().take();
        if let Some(previous) = previous {
            self.close(&previous);
            record(
                &self.logger,
                LogEvent::new("session_logout").with_session(self.session_id),
            );
        }
    }

    fn close(&self, wallet: &Wallet) {
        if let Some(recorder) = &self.recorder {
            recorder.close_book(wallet.user_id());
        }
    }

    /// Snapshot of the signed-in user, if any
    pub fn current_user(&self) -> Option<User> {
        self.wallet().and_then(|wallet| wallet.snapshot().ok())
    }

    pub fn state(&self) -> SessionState {
        match self.current_user() {
            None => SessionState::Anonymous,
            Some(user) if user.has_activated => SessionState::Activated,
            Some(_) => SessionState::Unactivated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.slot().is_some()
    }

    /// Handle on the signed-in user's wallet
    pub fn wallet(&self) -> Option<Wallet> {
        self.slot().as_ref().cloned()
    }

    // The slot only ever holds a complete value, so a poisoned lock is safe to reuse.
    fn slot(&self) -> RwLockReadGuard<'_, Option<Wallet>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot_mut(&self) -> RwLockWriteGuard<'_, Option<Wallet>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}
