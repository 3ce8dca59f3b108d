//! Wallet service - the send-money flow
//!
//! Ties the session, recipient resolution, validation and the recorder
//! together in the order a transfer has to pass through them.

use std::sync::Arc;

use crate::domain::result::{ActivationError, Error, Result, ValidationError};
use crate::domain::{is_account_number, ReceiptId, TransactionReceipt, TransferRequest};
use crate::services::ledger::{LedgerEngine, Wallet};
use crate::services::logging::{record, LogEvent, LoggingService};
use crate::services::recorder::{TransactionRecorder, TransferTicket};
use crate::services::session::SessionStore;
use crate::services::validator::TransferValidator;

pub struct WalletService {
    ledger: Arc<LedgerEngine>,
    validator: Arc<TransferValidator>,
    recorder: Arc<TransactionRecorder>,
    enforce_activation: bool,
    logger: Option<Arc<LoggingService>>,
}

impl WalletService {
    pub fn new(
        ledger: Arc<LedgerEngine>,
        validator: Arc<TransferValidator>,
        recorder: Arc<TransactionRecorder>,
    ) -> Self {
        Self {
            ledger,
            validator,
            recorder,
            enforce_activation: false,
            logger: None,
        }
    }

    /// Refuse transfers from wallets that have not paid the activation fee
    pub fn with_enforce_activation(mut self, enforce: bool) -> Self {
        self.enforce_activation = enforce;
        self
    }

    pub fn with_logger(mut self, logger: Option<Arc<LoggingService>>) -> Self {
        self.logger = logger;
        self
    }

    /// Send money from the signed-in wallet
    ///
    /// On success the transfer is Pending; the ticket resolves once it is
    /// settled. The balance only moves at settlement.
    pub async fn submit_transfer(
        &self,
        session: &SessionStore,
        mut request: TransferRequest,
    ) -> Result<TransferTicket> {
        let result = self.try_submit(session, &mut request).await;

        let event = match &result {
            Ok(ticket) => LogEvent::new("transfer_submitted").with_reference(ticket.id()),
            Err(e) => LogEvent::new("transfer_rejected").with_error(rejection_code(e)),
        };
        record(&self.logger, event.with_session(session.session_id()));

        result
    }

    async fn try_submit(
        &self,
        session: &SessionStore,
        request: &mut TransferRequest,
    ) -> Result<TransferTicket> {
        let wallet = self.require_wallet(session)?;

        if self.enforce_activation && !wallet.snapshot()?.has_activated {
            return Err(ActivationError::ActivationRequired.into());
        }

        // Malformed numbers are left for the validator to report alongside
        // everything else that is wrong with the request.
        let account_number = request.account_number.trim();
        if is_account_number(account_number) {
            let name = self.validator.resolve_recipient(account_number).await?;
            request.account_name = Some(name);
        }

        let balance = self.ledger.balance(&wallet)?;
        let transfer = self.validator.validate(request, balance)?;

        self.recorder.commit(&wallet, transfer)
    }

    /// Name of the holder of `account_number`
    pub async fn lookup_recipient(&self, account_number: &str) -> Result<String> {
        self.validator.resolve_recipient(account_number).await
    }

    /// Receipts of the signed-in user, oldest first
    pub fn history(&self, session: &SessionStore) -> Result<Vec<TransactionReceipt>> {
        let wallet = self.require_wallet(session)?;
        Ok(self.recorder.history(wallet.user_id()))
    }

    pub fn receipt(&self, session: &SessionStore, id: ReceiptId) -> Result<Option<TransactionReceipt>> {
        let wallet = self.require_wallet(session)?;
        Ok(self.recorder.receipt(wallet.user_id(), id))
    }

    fn require_wallet(&self, session: &SessionStore) -> Result<Wallet> {
        session
            .wallet()
            .ok_or_else(|| ActivationError::NotAuthenticated.into())
    }
}

fn rejection_code(err: &Error) -> String {
    match err {
        Error::Validation(errors) => errors
            .iter()
            .map(ValidationError::code)
            .collect::<Vec<_>>()
            .join(","),
        Error::Activation(ActivationError::NotAuthenticated) => "not_authenticated".to_string(),
        Error::Activation(ActivationError::ActivationRequired) => "activation_required".to_string(),
        Error::Concurrency(_) => "transfer_in_progress".to_string(),
        Error::Directory(_) => "directory_unavailable".to_string(),
        _ => "internal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ManualSettlement, StaticBankDirectory};
    use crate::domain::result::TransferField;
    use crate::domain::ReceiptStatus;
    use crate::services::logging::EntryPoint;
    use rust_decimal::Decimal;

    struct Fixture {
        service: WalletService,
        settlement: Arc<ManualSettlement>,
        session: SessionStore,
    }

    fn fixture(enforce_activation: bool) -> Fixture {
        let ledger = Arc::new(LedgerEngine::new());
        let settlement = Arc::new(ManualSettlement::new());
        let directory = StaticBankDirectory::new()
            .with_account("1234567890", "Kemi Adebayo")
            .with_account("0987654321", "David Okafor");
        let validator = Arc::new(TransferValidator::new(Arc::new(directory)));
        let recorder = Arc::new(TransactionRecorder::new(ledger.clone(), settlement.clone()));
        let service = WalletService::new(ledger, validator, recorder)
            .with_enforce_activation(enforce_activation);

        Fixture {
            service,
            settlement,
            session: SessionStore::new(Decimal::new(100_000, 0)),
        }
    }

    fn request(amount: &str) -> TransferRequest {
        TransferRequest::new("GT Bank", "1234567890", amount)
    }

    #[tokio::test]
    async fn test_requires_session() {
        let f = fixture(false);
        let err = f.service.submit_transfer(&f.session, request("10")).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Activation(ActivationError::NotAuthenticated)
        ));
        assert!(f.service.history(&f.session).is_err());
    }

    #[tokio::test]
    async fn test_resolved_name_replaces_supplied_one() {
        let f = fixture(false);
        f.session.login("08000000000", "abcd").unwrap();

        let ticket = f
            .service
            .submit_transfer(&f.session, request("20000").with_account_name("Someone Else"))
            .await
            .unwrap();
        assert_eq!(ticket.receipt().recipient.account_name, "Kemi Adebayo");
        assert_eq!(ticket.receipt().status, ReceiptStatus::Pending);

        f.settlement.confirm();
        let settled = ticket.settled().await.unwrap();
        assert_eq!(settled.status, ReceiptStatus::Successful);
        assert_eq!(
            f.session.current_user().unwrap().balance,
            Decimal::new(80_000, 0)
        );
    }

    #[tokio::test]
    async fn test_unknown_recipient_is_rejected_before_affordability() {
        let f = fixture(false);
        f.session.login("08000000000", "abcd").unwrap();

        let err = f
            .service
            .submit_transfer(&f.session, TransferRequest::new("UBA", "5555555555", "999999999"))
            .await
            .unwrap_err();
        assert_eq!(
            err.validation_errors(),
            &[ValidationError::RecipientNotFound("5555555555".to_string())]
        );
        assert!(f.service.history(&f.session).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_request_reports_every_problem() {
        let f = fixture(false);
        f.session.login("08000000000", "abcd").unwrap();

        let err = f
            .service
            .submit_transfer(&f.session, TransferRequest::new("", "12ab", "abc"))
            .await
            .unwrap_err();
        assert_eq!(
            err.validation_errors(),
            &[
                ValidationError::MissingField(TransferField::BankName),
                ValidationError::MissingField(TransferField::AccountName),
                ValidationError::InvalidAccountNumber,
                ValidationError::InvalidAmount,
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_account_is_not_judged_on_balance() {
        let f = fixture(false);
        f.session.login("08000000000", "abcd").unwrap();

        let err = f
            .service
            .submit_transfer(&f.session, TransferRequest::new("GT Bank", "12345", "999999999"))
            .await
            .unwrap_err();
        assert_eq!(
            err.validation_errors(),
            &[
                ValidationError::MissingField(TransferField::AccountName),
                ValidationError::InvalidAccountNumber,
            ]
        );
        assert!(f.service.history(&f.session).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_activation_guard() {
        let f = fixture(true);
        f.session.login("08000000000", "abcd").unwrap();

        let err = f.service.submit_transfer(&f.session, request("10")).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Activation(ActivationError::ActivationRequired)
        ));
    }

    #[tokio::test]
    async fn test_receipt_lookup_is_per_user() {
        let f = fixture(false);
        f.session.login("08000000000", "abcd").unwrap();
        let ticket = f.service.submit_transfer(&f.session, request("10")).await.unwrap();
        let id = ticket.id();

        assert!(f.service.receipt(&f.session, id).unwrap().is_some());

        f.session.login("08099999999", "wxyz").unwrap();
        assert!(f.service.receipt(&f.session, id).unwrap().is_none());
        assert!(f.service.history(&f.session).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_outcomes_are_logged_without_details() {
        let logger = Arc::new(LoggingService::in_memory(EntryPoint::App, "test").unwrap());
        let mut f = fixture(false);
        f.service = f.service.with_logger(Some(logger.clone()));
        f.session.login("08000000000", "abcd").unwrap();

        f.service.submit_transfer(&f.session, request("10")).await.unwrap();
        let _ = f.service.submit_transfer(&f.session, request("10")).await;
        let _ = f.service.submit_transfer(&f.session, request("500000")).await;

        let errors = logger.get_errors(10).unwrap();
        let codes: Vec<&str> = errors
            .iter()
            .filter_map(|e| e.error_message.as_deref())
            .collect();
        assert_eq!(codes, vec!["insufficient_balance", "transfer_in_progress"]);
        assert_eq!(logger.count().unwrap(), 3);
    }
}
