//! Result and error types for the core library

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::receipt::ReceiptId;

/// Login and registration failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials: phone number is required and password needs at least 4 characters")]
    InvalidCredentials,
}

/// Failures of operations that need an authenticated (or activated) session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivationError {
    #[error("No user is logged in")]
    NotAuthenticated,

    #[error("Wallet must be activated before sending transfers")]
    ActivationRequired,
}

/// Transfer request fields, used to name what is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferField {
    BankName,
    AccountNumber,
    AccountName,
    Amount,
}

impl fmt::Display for TransferField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferField::BankName => "bank name",
            TransferField::AccountNumber => "account number",
            TransferField::AccountName => "account name",
            TransferField::Amount => "amount",
        };
        f.write_str(name)
    }
}

/// A single reason a transfer request was turned down
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing field: {0}")]
    MissingField(TransferField),

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },

    #[error("No account found for {0}")]
    RecipientNotFound(String),

    #[error("Unsupported bank: {0}")]
    UnknownBank(String),

    #[error("Account number must be exactly 10 digits")]
    InvalidAccountNumber,
}

impl ValidationError {
    /// Stable short name, safe to log
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "missing_field",
            ValidationError::InvalidAmount => "invalid_amount",
            ValidationError::InsufficientBalance { .. } => "insufficient_balance",
            ValidationError::RecipientNotFound(_) => "recipient_not_found",
            ValidationError::UnknownBank(_) => "unknown_bank",
            ValidationError::InvalidAccountNumber => "invalid_account_number",
        }
    }
}

/// At most one transfer per user may be pending
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConcurrencyError {
    #[error("Transfer {0} is still pending")]
    TransferInProgress(ReceiptId),
}

/// Balance mutations the ledger refuses to perform
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Balance {balance} cannot absorb a change of {delta}")]
    Overdraft { balance: Decimal, delta: Decimal },
}

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Activation(#[from] ActivationError),

    #[error("Validation error: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Concurrency(#[from] ConcurrencyError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Bank directory error: {0}")]
    Directory(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a bank directory error
    pub fn directory(msg: impl Into<String>) -> Self {
        Self::Directory(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Validation errors carried by this error, if any
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Error::Validation(errors) => errors,
            _ => &[],
        }
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(vec![err])
    }
}

impl From<Vec<ValidationError>> for Error {
    fn from(errors: Vec<ValidationError>) -> Self {
        Error::Validation(errors)
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result with optional context (for JSON output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: None,
        }
    }

    /// Create a failed result with context
    pub fn fail_with_context(
        error: impl Into<String>,
        context: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: Some(context),
        }
    }
}

impl<T> From<&Error> for OperationResult<T> {
    fn from(err: &Error) -> Self {
        match err {
            Error::Validation(errors) => {
                let reasons: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| serde_json::Value::String(e.to_string()))
                    .collect();
                let mut context = HashMap::new();
                context.insert("reasons".to_string(), serde_json::Value::Array(reasons));
                Self::fail_with_context("Transfer request rejected", context)
            }
            e => Self::fail(e.to_string()),
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::from(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_result_from_borrowed_error() {
        let err = Error::Validation(vec![
            ValidationError::MissingField(TransferField::BankName),
            ValidationError::InvalidAmount,
        ]);
        let result = OperationResult::<()>::from(&err);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Transfer request rejected"));
        assert_eq!(result.context.unwrap()["reasons"].as_array().unwrap().len(), 2);

        let result = OperationResult::<()>::from(&Error::directory("offline"));
        assert!(result.context.is_none());
        assert!(result.error.unwrap().contains("offline"));
    }

    #[test]
    fn test_operation_result_ok() {
        let result: OperationResult<i32> = OperationResult::ok(42);
        assert!(result.success);
        assert_eq!(result.data, Some(42));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_validation_errors_are_joined() {
        let err = Error::Validation(vec![
            ValidationError::MissingField(TransferField::BankName),
            ValidationError::InvalidAmount,
        ]);
        assert_eq!(
            err.to_string(),
            "Validation error: Missing field: bank name; Invalid amount"
        );
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn test_validation_codes_carry_no_input() {
        let err = ValidationError::InsufficientBalance {
            requested: Decimal::new(5, 0),
            available: Decimal::ONE,
        };
        assert_eq!(err.code(), "insufficient_balance");
        assert_eq!(
            ValidationError::RecipientNotFound("1234567890".into()).code(),
            "recipient_not_found"
        );
    }

    #[test]
    fn test_from_result_keeps_validation_reasons() {
        let err: Result<i32> = Err(ValidationError::InvalidAccountNumber.into());
        let result: OperationResult<i32> = err.into();
        assert!(!result.success);

        let reasons = result.context.unwrap();
        assert_eq!(
            reasons["reasons"],
            serde_json::json!(["Account number must be exactly 10 digits"])
        );
    }

    #[test]
    fn test_from_result_plain_error() {
        let err: Result<i32> = Err(AuthError::InvalidCredentials.into());
        let result: OperationResult<i32> = err.into();
        assert!(result.error.unwrap().starts_with("Invalid credentials"));
        assert!(result.context.is_none());
    }
}
