//! Transfer request and recipient models

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Plain digits with up to two decimals, optionally grouped with commas ("20,000.50")
fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+|\d{1,3}(,\d{3})+)(\.\d{1,2})?$").expect("amount pattern is valid")
    })
}

/// Parse a user-entered amount
///
/// Returns `None` unless the input is a positive number with at most two
/// fractional digits.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let input = input.trim();
    if !amount_pattern().is_match(input) {
        return None;
    }
    let amount = Decimal::from_str(&input.replace(',', "")).ok()?;
    (amount > Decimal::ZERO).then(|| amount.normalize())
}

/// True if `account_number` is exactly ten ASCII digits
pub fn is_account_number(account_number: &str) -> bool {
    account_number.len() == 10 && account_number.bytes().all(|b| b.is_ascii_digit())
}

/// An outbound transfer as entered by the user
///
/// Fields stay raw strings until the validator has looked at them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub bank_name: String,
    pub account_number: String,
    /// Filled in by recipient resolution
    #[serde(default)]
    pub account_name: Option<String>,
    pub amount: String,
}

impl TransferRequest {
    pub fn new(
        bank_name: impl Into<String>,
        account_number: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            bank_name: bank_name.into(),
            account_number: account_number.into(),
            account_name: None,
            amount: amount.into(),
        }
    }

    pub fn with_account_name(mut self, account_name: impl Into<String>) -> Self {
        self.account_name = Some(account_name.into());
        self
    }
}

/// Who receives a transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub account_name: String,
    pub account_number: String,
    pub bank_name: String,
}

/// A transfer that passed validation
///
/// Only the validator can build one, so holding a `ValidTransfer` means the
/// fields were checked against the balance at validation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidTransfer {
    recipient: Recipient,
    amount: Decimal,
}

impl ValidTransfer {
    pub(crate) fn new(recipient: Recipient, amount: Decimal) -> Self {
        Self { recipient, amount }
    }

    pub fn recipient(&self) -> &Recipient {
        &self.recipient
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("20000"), Some(Decimal::new(20000, 0)));
        assert_eq!(parse_amount(" 250.5 "), Some(Decimal::new(2505, 1)));
        assert_eq!(parse_amount("20,000.75"), Some(Decimal::new(2000075, 2)));
        assert_eq!(parse_amount("0.01"), Some(Decimal::new(1, 2)));
    }

    #[test]
    fn test_parse_amount_rejects_bad_input() {
        for input in ["", "0", "0.00", "-5", "+5", "abc", "1.234", "1e5", "2,00", "12 000"] {
            assert_eq!(parse_amount(input), None, "input {:?}", input);
        }
    }

    #[test]
    fn test_is_account_number() {
        assert!(is_account_number("1234567890"));
        assert!(!is_account_number("123456789"));
        assert!(!is_account_number("12345678901"));
        assert!(!is_account_number("12345abcde"));
        assert!(!is_account_number("١٢٣٤٥٦٧٨٩٠"));
    }
}
