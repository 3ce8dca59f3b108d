//! Supported banks and the manual activation payment rail

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Banks a transfer can be sent to
pub const SUPPORTED_BANKS: &[&str] = &[
    "Access Bank",
    "GT Bank",
    "UBA",
    "Zenith Bank",
    "First Bank",
    "Fidelity Bank",
    "FCMB",
    "Sterling Bank",
    "Union Bank",
    "Wema Bank",
    "Polaris Bank",
    "Stanbic IBTC",
    "Kuda Bank",
    "Opay",
    "PalmPay",
    "Moniepoint",
    "VBank",
    "Ecobank",
];

/// Look up the canonical spelling of a supported bank (case-insensitive)
pub fn canonical_bank_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    SUPPORTED_BANKS
        .iter()
        .copied()
        .find(|bank| bank.eq_ignore_ascii_case(name))
}

/// Account the activation fee is paid into, outside of the app
///
/// The core never sees the payment itself; it only shows these details
/// and trusts the caller's confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRail {
    pub account_number: String,
    pub account_name: String,
    pub bank_name: String,
    pub fee: Decimal,
}

impl Default for PaymentRail {
    fn default() -> Self {
        Self {
            account_number: "9163110673".to_string(),
            account_name: "Abdullahi".to_string(),
            bank_name: "Opay".to_string(),
            fee: Decimal::new(6000, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_bank_name() {
        assert_eq!(canonical_bank_name("gt bank"), Some("GT Bank"));
        assert_eq!(canonical_bank_name("  Kuda Bank "), Some("Kuda Bank"));
        assert_eq!(canonical_bank_name("Bank of Nowhere"), None);
        assert_eq!(canonical_bank_name(""), None);
    }
}
