//! Ledger engine - balance reads and mutations
//!
//! The user record of a session lives behind a lock in `Wallet`. Every
//! balance change is a single read-modify-write under that lock, so readers
//! never see half of an update.

use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, LedgerError, Result};
use crate::domain::User;

/// Shared handle to the user record of one session
///
/// Cloning the handle shares the record. A settlement in progress holds a
/// clone, which keeps the record alive after logout.
#[derive(Debug, Clone)]
pub struct Wallet {
    user_id: Uuid,
    user: Arc<RwLock<User>>,
}

impl Wallet {
    pub(crate) fn new(user: User) -> Self {
        Self {
            user_id: user.id,
            user: Arc::new(RwLock::new(user)),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Copy of the current user record
    pub fn snapshot(&self) -> Result<User> {
        let user = self
            .user
            .read()
            .map_err(|e| Error::internal(format!("Lock poisoned: {}", e)))?;
        Ok(user.clone())
    }

    /// Run `f` with exclusive access to the user record
    pub(crate) fn update<T>(&self, f: impl FnOnce(&mut User) -> Result<T>) -> Result<T> {
        let mut user = self
            .user
            .write()
            .map_err(|e| Error::internal(format!("Lock poisoned: {}", e)))?;
        f(&mut user)
    }
}

/// Applies balance changes and keeps every balance non-negative
///
/// Affordability is the validator's job; the ledger only refuses writes
/// that would break the invariant.
#[derive(Debug, Clone, Default)]
pub struct LedgerEngine;

impl LedgerEngine {
    pub fn new() -> Self {
        Self
    }

    /// Current balance
    pub fn balance(&self, wallet: &Wallet) -> Result<Decimal> {
        Ok(wallet.snapshot()?.balance)
    }

    /// Add `delta` (negative for debits) and return the new balance
    pub fn apply_delta(&self, wallet: &Wallet, delta: Decimal) -> Result<Decimal> {
        wallet.update(|user| {
            let target = user.balance + delta;
            self.post(user, target)
        })
    }

    /// Replace the balance outright and return it
    pub fn reset_balance(&self, wallet: &Wallet, amount: Decimal) -> Result<Decimal> {
        wallet.update(|user| self.post(user, amount))
    }

    /// Write `target` as the new balance of an already locked record
    pub(crate) fn post(&self, user: &mut User, target: Decimal) -> Result<Decimal> {
        if target < Decimal::ZERO {
            return Err(LedgerError::Overdraft {
                balance: user.balance,
                delta: target - user.balance,
            }
            .into());
        }
        user.balance = target;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet(balance: i64) -> Wallet {
        Wallet::new(User::new("08000000000", Decimal::new(balance, 0)))
    }

    #[test]
    fn test_apply_delta_credit_and_debit() {
        let ledger = LedgerEngine::new();
        let wallet = wallet(1000);

        assert_eq!(
            ledger.apply_delta(&wallet, Decimal::new(500, 0)).unwrap(),
            Decimal::new(1500, 0)
        );
        assert_eq!(
            ledger.apply_delta(&wallet, Decimal::new(-1500, 0)).unwrap(),
            Decimal::ZERO
        );
        assert_eq!(ledger.balance(&wallet).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_overdraft_is_refused_and_balance_kept() {
        let ledger = LedgerEngine::new();
        let wallet = wallet(100);

        let err = ledger
            .apply_delta(&wallet, Decimal::new(-101, 0))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::Overdraft { .. })
        ));
        assert_eq!(ledger.balance(&wallet).unwrap(), Decimal::new(100, 0));
    }

    #[test]
    fn test_reset_balance_replaces() {
        let ledger = LedgerEngine::new();
        let wallet = wallet(42);

        ledger.reset_balance(&wallet, Decimal::new(100000, 0)).unwrap();
        assert_eq!(ledger.balance(&wallet).unwrap(), Decimal::new(100000, 0));
        assert!(ledger.reset_balance(&wallet, Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_clones_share_the_record() {
        let ledger = LedgerEngine::new();
        let wallet = wallet(10);
        let other = wallet.clone();

        ledger.apply_delta(&other, Decimal::new(5, 0)).unwrap();
        assert_eq!(wallet.snapshot().unwrap().balance, Decimal::new(15, 0));
        assert_eq!(wallet.user_id(), other.user_id());
    }

    #[test]
    fn test_concurrent_deltas_are_not_lost() {
        let ledger = LedgerEngine::new();
        let wallet = wallet(0);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let wallet = wallet.clone();
                std::thread::spawn(move || {
                    let ledger = LedgerEngine::new();
                    for _ in 0..100 {
                        ledger.apply_delta(&wallet, Decimal::ONE).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ledger.balance(&wallet).unwrap(), Decimal::new(800, 0));
    }
}
