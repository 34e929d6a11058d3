//! Two-step business loan application: shared field rules, the step gate, the wizard
//! session, and delivery of the consolidated payload.

pub mod aggregate;
pub mod documents;
pub mod domain;
pub mod gate;
pub mod intake;
pub mod router;
pub mod submission;
pub mod validation;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use aggregate::{merge, ApplicationPatch};
pub use documents::BankStatement;
pub use domain::{
    ApplicationData, BusinessDetails, CreditBand, Director, DirectorTag, Guarantor, LoanDetails,
    Relationship, GUARANTOR_CREDIT_THRESHOLD, MINIMUM_GUARANTORS,
};
pub use gate::{
    check_application, check_business_details, check_loan_details, StepBlocked, ValidationIssue,
};
pub use intake::{IntakeError, LoanIntakeService};
pub use router::{intake_router, LOAN_APPLICATIONS_PATH};
pub use submission::{
    HttpSubmissionGateway, SimulatedSubmissionGateway, SubmissionError, SubmissionGateway,
    SubmissionReceipt, DEFAULT_SUBMISSION_DELAY,
};
pub use validation::FieldError;
pub use wizard::{
    FieldRef, LoanApplicationWizard, Notification, Severity, WizardError, WizardStep,
    SUBMISSION_FAILURE_MESSAGE, SUBMISSION_SUCCESS_MESSAGE,
};
