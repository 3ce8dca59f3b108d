//! User domain model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The wallet holder of an authenticated session
///
/// `balance` never drops below zero; only the ledger and the activation
/// gate change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub phone_number: String,
    pub balance: Decimal,
    /// Wallet network indicator, switched on by activation
    pub is_connected: bool,
    pub has_activated: bool,
}

impl User {
    pub fn new(phone_number: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone_number: phone_number.into(),
            balance,
            is_connected: false,
            has_activated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("08011112222", Decimal::ZERO);
        assert_eq!(user.phone_number, "08011112222");
        assert_eq!(user.balance, Decimal::ZERO);
        assert!(!user.is_connected);
        assert!(!user.has_activated);
    }

    #[test]
    fn test_user_ids_are_unique() {
        let a = User::new("08011112222", Decimal::ZERO);
        let b = User::new("08011112222", Decimal::ZERO);
        assert_ne!(a.id, b.id);
    }
}
