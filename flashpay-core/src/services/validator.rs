//! Transfer validator - field, format and affordability checks

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::result::{Error, Result, TransferField, ValidationError};
use crate::domain::{
    canonical_bank_name, is_account_number, parse_amount, Recipient, TransferRequest,
    ValidTransfer,
};
use crate::ports::ExternalBankDirectory;

/// Checks transfer requests before they reach the recorder
pub struct TransferValidator {
    directory: Arc<dyn ExternalBankDirectory>,
}

impl TransferValidator {
    pub fn new(directory: Arc<dyn ExternalBankDirectory>) -> Self {
        Self { directory }
    }

    /// Name of the directory used for recipient lookups
    pub fn directory_name(&self) -> &str {
        self.directory.name()
    }

    /// Find the holder of a destination account
    pub async fn resolve_recipient(&self, account_number: &str) -> Result<String> {
        let account_number = account_number.trim();
        if !is_account_number(account_number) {
            return Err(ValidationError::InvalidAccountNumber.into());
        }

        match self.directory.lookup(account_number).await {
            Ok(Some(name)) if !name.trim().is_empty() => Ok(name),
            Ok(_) => Err(ValidationError::RecipientNotFound(account_number.to_string()).into()),
            Err(Error::Directory(msg)) => Err(Error::Directory(msg)),
            Err(e) => Err(Error::directory(e.to_string())),
        }
    }

    /// Check `request` against `current_balance`
    ///
    /// Every failing check is reported. Affordability is only judged once
    /// the amount is valid and the recipient has a well-formed account
    /// number and a resolved name.
    pub fn validate(
        &self,
        request: &TransferRequest,
        current_balance: Decimal,
    ) -> std::result::Result<ValidTransfer, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let bank_name = request.bank_name.trim();
        let account_number = request.account_number.trim();
        let account_name = request
            .account_name
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        let amount_input = request.amount.trim();

        for (field, value) in [
            (TransferField::BankName, bank_name),
            (TransferField::AccountNumber, account_number),
            (TransferField::Amount, amount_input),
            (TransferField::AccountName, account_name),
        ] {
            if value.is_empty() {
                errors.push(ValidationError::MissingField(field));
            }
        }

        let bank = if bank_name.is_empty() {
            None
        } else {
            let bank = canonical_bank_name(bank_name);
            if bank.is_none() {
                errors.push(ValidationError::UnknownBank(bank_name.to_string()));
            }
            bank
        };

        let recipient_known = !account_name.is_empty() && is_account_number(account_number);
        if !account_number.is_empty() && !is_account_number(account_number) {
            errors.push(ValidationError::InvalidAccountNumber);
        }

        let amount = if amount_input.is_empty() {
            None
        } else {
            let amount = parse_amount(amount_input);
            match amount {
                None => errors.push(ValidationError::InvalidAmount),
                Some(amount) if recipient_known && amount > current_balance => {
                    errors.push(ValidationError::InsufficientBalance {
                        requested: amount,
                        available: current_balance,
                    })
                }
                Some(_) => {}
            }
            amount
        };

        match (bank, amount) {
            (Some(bank), Some(amount)) if errors.is_empty() => Ok(ValidTransfer::new(
                Recipient {
                    account_name: account_name.to_string(),
                    account_number: account_number.to_string(),
                    bank_name: bank.to_string(),
                },
                amount,
            )),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StaticBankDirectory;
    use async_trait::async_trait;

    fn validator() -> TransferValidator {
        TransferValidator::new(Arc::new(
            StaticBankDirectory::new().with_account("1234567890", "Kemi Adebayo"),
        ))
    }

    fn request(amount: &str) -> TransferRequest {
        TransferRequest::new("GT Bank", "1234567890", amount).with_account_name("Kemi Adebayo")
    }

    #[test]
    fn test_valid_request() {
        let valid = validator()
            .validate(&request("20000"), Decimal::new(100_000, 0))
            .unwrap();
        assert_eq!(valid.amount(), Decimal::new(20000, 0));
        assert_eq!(valid.recipient().bank_name, "GT Bank");
        assert_eq!(valid.recipient().account_name, "Kemi Adebayo");
    }

    #[test]
    fn test_bank_name_is_canonicalised() {
        let req = TransferRequest::new(" gt bank ", "1234567890", "10").with_account_name("Kemi");
        let valid = validator().validate(&req, Decimal::new(10, 0)).unwrap();
        assert_eq!(valid.recipient().bank_name, "GT Bank");
    }

    #[test]
    fn test_amount_equal_to_balance_is_allowed() {
        assert!(validator()
            .validate(&request("100000"), Decimal::new(100_000, 0))
            .is_ok());
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let errors = validator()
            .validate(&TransferRequest::default(), Decimal::new(100, 0))
            .unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingField(TransferField::BankName),
                ValidationError::MissingField(TransferField::AccountNumber),
                ValidationError::MissingField(TransferField::Amount),
                ValidationError::MissingField(TransferField::AccountName),
            ]
        );
    }

    #[test]
    fn test_invalid_amounts() {
        for amount in ["0", "-100", "abc", "10.005"] {
            let errors = validator()
                .validate(&request(amount), Decimal::new(100_000, 0))
                .unwrap_err();
            assert_eq!(errors, vec![ValidationError::InvalidAmount], "amount {:?}", amount);
        }
    }

    #[test]
    fn test_insufficient_balance() {
        let errors = validator()
            .validate(&request("100000.01"), Decimal::new(100_000, 0))
            .unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InsufficientBalance {
                requested: Decimal::new(10_000_001, 2),
                available: Decimal::new(100_000, 0),
            }]
        );
    }

    #[test]
    fn test_unknown_bank_and_bad_account_number() {
        let req = TransferRequest::new("Bank of Nowhere", "12345", "10").with_account_name("X");
        let errors = validator().validate(&req, Decimal::new(100, 0)).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::UnknownBank("Bank of Nowhere".to_string()),
                ValidationError::InvalidAccountNumber,
            ]
        );
    }

    #[test]
    fn test_affordability_waits_for_recipient() {
        let balance = Decimal::new(100_000, 0);

        let errors = validator()
            .validate(&TransferRequest::new("GT Bank", "12345", "999999999"), balance)
            .unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingField(TransferField::AccountName),
                ValidationError::InvalidAccountNumber,
            ]
        );

        // Well-formed number but nobody resolved it
        let errors = validator()
            .validate(&TransferRequest::new("GT Bank", "1234567890", "999999999"), balance)
            .unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::MissingField(TransferField::AccountName)]
        );
    }

    #[tokio::test]
    async fn test_resolve_recipient() {
        let validator = validator();
        assert_eq!(
            validator.resolve_recipient("1234567890").await.unwrap(),
            "Kemi Adebayo"
        );

        let err = validator.resolve_recipient("0000000000").await.unwrap_err();
        assert_eq!(
            err.validation_errors(),
            &[ValidationError::RecipientNotFound("0000000000".to_string())]
        );

        let err = validator.resolve_recipient("12345").await.unwrap_err();
        assert_eq!(err.validation_errors(), &[ValidationError::InvalidAccountNumber]);
    }

    struct OfflineDirectory;

    #[async_trait]
    impl ExternalBankDirectory for OfflineDirectory {
        fn name(&self) -> &str {
            "offline"
        }

        async fn lookup(&self, _account_number: &str) -> Result<Option<String>> {
            Err(Error::directory("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_directory_outage_is_not_a_validation_error() {
        let validator = TransferValidator::new(Arc::new(OfflineDirectory));
        let err = validator.resolve_recipient("1234567890").await.unwrap_err();
        assert!(matches!(err, Error::Directory(_)));
    }
}
