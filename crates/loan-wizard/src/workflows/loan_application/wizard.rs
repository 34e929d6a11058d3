use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::aggregate::ApplicationPatch;
use super::domain::ApplicationData;
use super::gate::{check_business_details, check_loan_details, StepBlocked, ValidationIssue};
use super::submission::{SubmissionError, SubmissionGateway, SubmissionReceipt};
use super::validation::{validate_credit_score, validate_pan, validate_tax_id, FieldError};

pub const SUBMISSION_FAILURE_MESSAGE: &str =
    "Failed to submit application. Please try again later.";
pub const SUBMISSION_SUCCESS_MESSAGE: &str =
    "Your loan application has been submitted successfully!";

/// Position of a session within the two-step wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    BusinessDetails,
    LoanDetails,
    Submitted,
}

impl WizardStep {
    pub const fn index(self) -> usize {
        match self {
            WizardStep::BusinessDetails => 0,
            WizardStep::LoanDetails => 1,
            WizardStep::Submitted => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WizardStep::BusinessDetails => "Business Details",
            WizardStep::LoanDetails => "Loan Details",
            WizardStep::Submitted => "Submitted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
}

/// Transient toast raised by the submission round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// Inputs that get checked on blur, before any transition is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef {
    Gstin,
    DirectorPan(usize),
    CreditScore,
    GuarantorPan(usize),
}

impl FieldRef {
    fn path(self) -> String {
        match self {
            FieldRef::Gstin => "businessDetails.gstin".to_string(),
            FieldRef::DirectorPan(index) => format!("businessDetails.directors[{index}].panNumber"),
            FieldRef::CreditScore => "loanDetails.creditScore".to_string(),
            FieldRef::GuarantorPan(index) => format!("loanDetails.guarantors[{index}].panNumber"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Blocked(#[from] StepBlocked),
    #[error("cannot {action} from the {} step", .from.label())]
    InvalidTransition {
        from: WizardStep,
        action: &'static str,
    },
    #[error("application already submitted")]
    Closed,
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("no submission is in flight")]
    NoSubmissionInFlight,
    #[error("no such field to validate")]
    UnknownField,
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// One browser session's wizard: current step, aggregate, and what the user is shown.
#[derive(Debug, Clone)]
pub struct LoanApplicationWizard {
    step: WizardStep,
    data: ApplicationData,
    banner: Vec<ValidationIssue>,
    field_errors: BTreeMap<String, FieldError>,
    submitting: bool,
    notification: Option<Notification>,
    receipt: Option<SubmissionReceipt>,
}

impl Default for LoanApplicationWizard {
    fn default() -> Self {
        Self::with_data(ApplicationData::default())
    }
}

impl LoanApplicationWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: ApplicationData) -> Self {
        Self {
            step: WizardStep::BusinessDetails,
            data,
            banner: Vec::new(),
            field_errors: BTreeMap::new(),
            submitting: false,
            notification: None,
            receipt: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn data(&self) -> &ApplicationData {
        &self.data
    }

    pub fn banner(&self) -> &[ValidationIssue] {
        &self.banner
    }

    pub fn field_error(&self, field: FieldRef) -> Option<&FieldError> {
        self.field_errors.get(&field.path())
    }

    /// Submit control state; disabled while a round trip is pending.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    /// Record a sub-form change. Clears the banner, validates nothing.
    pub fn apply(&mut self, patch: ApplicationPatch) -> Result<(), WizardError> {
        if self.step == WizardStep::Submitted {
            return Err(WizardError::Closed);
        }

        debug!(section = patch.section(), "merging sub-form change");
        self.data = self.data.merged(patch);
        self.banner.clear();
        Ok(())
    }

    /// Blur-time check for a single input, remembered for inline display.
    pub fn validate_field(&mut self, field: FieldRef) -> Result<(), WizardError> {
        let business = &self.data.business_details;
        let loan = &self.data.loan_details;
        let outcome = match field {
            FieldRef::Gstin => validate_tax_id(&business.gstin),
            FieldRef::DirectorPan(index) => business
                .directors
                .get(index)
                .map(|director| validate_pan(&director.pan_number))
                .ok_or(WizardError::UnknownField)?,
            FieldRef::CreditScore => validate_credit_score(loan.credit_score),
            FieldRef::GuarantorPan(index) => loan
                .guarantors
                .get(index)
                .map(|guarantor| validate_pan(&guarantor.pan_number))
                .ok_or(WizardError::UnknownField)?,
        };

        match outcome {
            Ok(()) => {
                self.field_errors.remove(&field.path());
                Ok(())
            }
            Err(error) => {
                self.field_errors.insert(field.path(), error.clone());
                Err(StepBlocked {
                    step: self.step,
                    issues: vec![ValidationIssue::new(field.path(), error.to_string())],
                }
                .into())
            }
        }
    }

    /// Business details -> loan details, gated on GSTIN and director PANs.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        match self.step {
            WizardStep::BusinessDetails => {}
            WizardStep::Submitted => return Err(WizardError::Closed),
            from => {
                return Err(WizardError::InvalidTransition {
                    from,
                    action: "advance",
                })
            }
        }

        if let Err(blocked) = check_business_details(&self.data.business_details) {
            warn!(
                issues = blocked.issues.len(),
                "business details incomplete; staying on step"
            );
            self.banner = blocked.issues.clone();
            return Err(blocked.into());
        }

        self.step = WizardStep::LoanDetails;
        self.banner.clear();
        info!(step = self.step.label(), "advanced wizard");
        Ok(self.step)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        match self.step {
            WizardStep::LoanDetails if self.submitting => Err(WizardError::SubmissionInFlight),
            WizardStep::LoanDetails => {
                self.step = WizardStep::BusinessDetails;
                self.banner.clear();
                debug!("returned to business details");
                Ok(self.step)
            }
            WizardStep::Submitted => Err(WizardError::Closed),
            from => Err(WizardError::InvalidTransition {
                from,
                action: "go back",
            }),
        }
    }

    /// Validate the loan step and lock the submit control, yielding the payload to send.
    pub fn begin_submission(&mut self) -> Result<ApplicationData, WizardError> {
        match self.step {
            WizardStep::LoanDetails => {}
            WizardStep::Submitted => return Err(WizardError::Closed),
            from => {
                return Err(WizardError::InvalidTransition {
                    from,
                    action: "submit",
                })
            }
        }

        if self.submitting {
            return Err(WizardError::SubmissionInFlight);
        }

        if let Err(blocked) = check_loan_details(&self.data.loan_details) {
            warn!(
                issues = blocked.issues.len(),
                "loan details incomplete; submission blocked"
            );
            self.banner = blocked.issues.clone();
            return Err(blocked.into());
        }

        self.banner.clear();
        self.notification = None;
        self.submitting = true;
        Ok(self.data.clone())
    }

    /// Settle the in-flight submission. Failures keep the session on the loan step.
    pub fn complete_submission(
        &mut self,
        outcome: Result<SubmissionReceipt, SubmissionError>,
    ) -> Result<SubmissionReceipt, WizardError> {
        if !self.submitting {
            return Err(WizardError::NoSubmissionInFlight);
        }
        self.submitting = false;

        match outcome {
            Ok(receipt) => {
                info!(reference = %receipt.reference, "loan application submitted");
                self.step = WizardStep::Submitted;
                self.receipt = Some(receipt.clone());
                self.notification = Some(Notification {
                    severity: Severity::Success,
                    message: SUBMISSION_SUCCESS_MESSAGE.to_string(),
                });
                Ok(receipt)
            }
            Err(error) => {
                warn!(%error, "loan application submission failed");
                self.notification = Some(Notification {
                    severity: Severity::Error,
                    message: SUBMISSION_FAILURE_MESSAGE.to_string(),
                });
                Err(error.into())
            }
        }
    }

    /// Unlock the submit control after a round trip that will never settle.
    ///
    /// Leaves the step, data and notification untouched. No-op when nothing is in flight.
    pub fn abandon_submission(&mut self) {
        if self.submitting {
            self.submitting = false;
            warn!(step = self.step.label(), "pending submission abandoned");
        }
    }

    /// Run the whole submit round trip through `gateway`.
    ///
    /// Dropping the returned future before it resolves (a timeout, a cancelled task) abandons
    /// the submission, so the session can retry or go back.
    pub async fn submit<G>(&mut self, gateway: &G) -> Result<SubmissionReceipt, WizardError>
    where
        G: SubmissionGateway,
    {
        let payload = self.begin_submission()?;
        let pending = PendingSubmission {
            wizard: self,
            settled: false,
        };
        let outcome = gateway.submit(&payload).await;
        pending.settle(outcome)
    }
}

/// Holds the submit lock across the gateway await and releases it if never settled.
struct PendingSubmission<'a> {
    wizard: &'a mut LoanApplicationWizard,
    settled: bool,
}

impl PendingSubmission<'_> {
    fn settle(
        mut self,
        outcome: Result<SubmissionReceipt, SubmissionError>,
    ) -> Result<SubmissionReceipt, WizardError> {
        self.settled = true;
        self.wizard.complete_submission(outcome)
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.wizard.abandon_submission();
        }
    }
}
