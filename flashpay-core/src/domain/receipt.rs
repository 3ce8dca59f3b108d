//! Transaction receipt domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::transfer::Recipient;

const RECEIPT_PREFIX: &str = "FP";

/// Receipt identifier, rendered as `FP<number>`
///
/// Ids compare in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReceiptId(u64);

impl ReceiptId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", RECEIPT_PREFIX, self.0)
    }
}

impl FromStr for ReceiptId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(RECEIPT_PREFIX)
            .and_then(|digits| digits.parse::<u64>().ok())
            .map(ReceiptId)
            .ok_or_else(|| format!("invalid receipt id: {}", s))
    }
}

impl Serialize for ReceiptId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReceiptId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Transfer,
}

/// Lifecycle of a receipt: Pending, then exactly one terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptStatus {
    Pending,
    Successful,
    Failed,
}

impl ReceiptStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReceiptStatus::Pending)
    }
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReceiptStatus::Pending => "Pending",
            ReceiptStatus::Successful => "Successful",
            ReceiptStatus::Failed => "Failed",
        };
        f.write_str(s)
    }
}

/// Record of a transfer, owned by the user that sent it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub id: ReceiptId,
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub recipient: Recipient,
    pub created_at: DateTime<Utc>,
    pub status: ReceiptStatus,
    pub settled_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
}

impl TransactionReceipt {
    /// Create a pending transfer receipt
    pub fn pending_transfer(
        id: ReceiptId,
        user_id: Uuid,
        amount: Decimal,
        recipient: Recipient,
    ) -> Self {
        Self {
            id,
            user_id,
            kind: TransactionKind::Transfer,
            amount,
            recipient,
            created_at: Utc::now(),
            status: ReceiptStatus::Pending,
            settled_at: None,
            failure_reason: None,
        }
    }

    pub(crate) fn mark_successful(&mut self) {
        self.status = ReceiptStatus::Successful;
        self.settled_at = Some(Utc::now());
    }

    pub(crate) fn mark_failed(&mut self, reason: impl Into<String>) {
        self.status = ReceiptStatus::Failed;
        self.settled_at = Some(Utc::now());
        self.failure_reason = Some(reason.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient() -> Recipient {
        Recipient {
            account_name: "Kemi Adebayo".to_string(),
            account_number: "1234567890".to_string(),
            bank_name: "GT Bank".to_string(),
        }
    }

    #[test]
    fn test_receipt_id_display_and_parse() {
        let id = ReceiptId::new(1_700_000_000_000);
        assert_eq!(id.to_string(), "FP1700000000000");
        assert_eq!("FP1700000000000".parse::<ReceiptId>().unwrap(), id);
        assert!("1700000000000".parse::<ReceiptId>().is_err());
        assert!("FPabc".parse::<ReceiptId>().is_err());
    }

    #[test]
    fn test_receipt_id_serializes_as_string() {
        let json = serde_json::to_string(&ReceiptId::new(42)).unwrap();
        assert_eq!(json, "\"FP42\"");
        let back: ReceiptId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ReceiptId::new(42));
    }

    #[test]
    fn test_status_transitions() {
        let mut receipt = TransactionReceipt::pending_transfer(
            ReceiptId::new(1),
            Uuid::new_v4(),
            Decimal::new(20000, 0),
            recipient(),
        );
        assert_eq!(receipt.status, ReceiptStatus::Pending);
        assert!(!receipt.status.is_terminal());
        assert!(receipt.settled_at.is_none());

        receipt.mark_failed("declined by network");
        assert_eq!(receipt.status, ReceiptStatus::Failed);
        assert!(receipt.status.is_terminal());
        assert!(receipt.settled_at.is_some());
        assert_eq!(receipt.failure_reason.as_deref(), Some("declined by network"));
    }
}
