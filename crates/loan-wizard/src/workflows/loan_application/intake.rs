use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use super::domain::ApplicationData;
use super::gate::{check_application, StepBlocked};
use super::submission::{SubmissionError, SubmissionGateway, SubmissionReceipt};

/// Receiving end of the loan-application endpoint.
///
/// Re-runs both step gates on the payload, so a client that skipped the wizard still gets the
/// same diagnostics the form would have shown.
#[derive(Debug, Default)]
pub struct LoanIntakeService {
    accepted: AtomicU64,
    rejected: AtomicU64,
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Invalid(#[from] StepBlocked),
}

impl LoanIntakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&self, payload: &ApplicationData) -> Result<SubmissionReceipt, IntakeError> {
        self.accept_on(payload, Local::now().date_naive())
    }

    pub fn accept_on(
        &self,
        payload: &ApplicationData,
        today: NaiveDate,
    ) -> Result<SubmissionReceipt, IntakeError> {
        if let Err(blocked) = check_application(payload) {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            warn!(
                step = blocked.step.label(),
                issues = blocked.issues.len(),
                "rejected loan application payload"
            );
            return Err(blocked.into());
        }

        let receipt = SubmissionReceipt::issue(today);
        self.accepted.fetch_add(1, Ordering::Relaxed);
        info!(
            reference = %receipt.reference,
            business = %payload.business_details.business_name,
            "accepted loan application"
        );
        Ok(receipt)
    }

    pub fn accepted_count(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }
}

/// In-process delivery, mapping validation failures to a 422 rejection.
impl SubmissionGateway for LoanIntakeService {
    async fn submit(
        &self,
        payload: &ApplicationData,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.accept(payload)
            .map_err(|_| SubmissionError::Rejected { status: 422 })
    }
}
