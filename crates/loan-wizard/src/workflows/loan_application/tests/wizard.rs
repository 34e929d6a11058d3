use super::common::*;
use crate::workflows::loan_application::aggregate::ApplicationPatch;
use crate::workflows::loan_application::domain::{ApplicationData, Relationship};
use crate::workflows::loan_application::submission::{
    SimulatedSubmissionGateway, SubmissionError,
};
use crate::workflows::loan_application::validation::FieldError;
use crate::workflows::loan_application::wizard::{
    FieldRef, LoanApplicationWizard, Severity, WizardError, WizardStep,
    SUBMISSION_FAILURE_MESSAGE,
};
use std::time::Duration;

#[test]
fn next_is_blocked_without_gstin() {
    let mut wizard = LoanApplicationWizard::new();
    let mut business = business_details();
    business.gstin.clear();
    wizard
        .apply(ApplicationPatch::BusinessDetails(business))
        .expect("patch applies");

    match wizard.next() {
        Err(WizardError::Blocked(blocked)) => {
            assert_eq!(blocked.issues[0].message, "GSTIN is required");
        }
        other => panic!("expected blocked transition, got {other:?}"),
    }
    assert_eq!(wizard.step(), WizardStep::BusinessDetails);
    assert_eq!(wizard.banner().len(), 1);
}

#[test]
fn next_advances_with_valid_gstin_and_director_pan() {
    let mut wizard = LoanApplicationWizard::new();
    wizard
        .apply(ApplicationPatch::BusinessDetails(business_details()))
        .expect("patch applies");

    assert_eq!(wizard.next().expect("gate passes"), WizardStep::LoanDetails);
    assert!(wizard.banner().is_empty());
}

#[test]
fn merging_clears_the_banner_without_validating() {
    let mut wizard = LoanApplicationWizard::new();
    assert!(wizard.next().is_err());
    assert!(!wizard.banner().is_empty());

    let mut still_invalid = business_details();
    still_invalid.gstin = "bad".to_string();
    wizard
        .apply(ApplicationPatch::BusinessDetails(still_invalid))
        .expect("merge never validates");

    assert!(wizard.banner().is_empty());
    assert_eq!(wizard.data().business_details.gstin, "bad");
}

#[test]
fn back_returns_to_business_details_unconditionally() {
    let mut wizard = wizard_on_loan_step(application());
    let mut loan = loan_details();
    loan.credit_score = Some(10.0);
    wizard
        .apply(ApplicationPatch::LoanDetails(loan))
        .expect("patch applies");

    assert_eq!(wizard.back().expect("back allowed"), WizardStep::BusinessDetails);
    assert!(matches!(
        wizard.back(),
        Err(WizardError::InvalidTransition {
            from: WizardStep::BusinessDetails,
            ..
        })
    ));
}

#[test]
fn submit_is_blocked_below_threshold_with_one_guarantor() {
    let mut wizard = wizard_on_loan_step(application());
    let mut loan = low_score_loan_details();
    loan.guarantors.truncate(1);
    wizard
        .apply(ApplicationPatch::LoanDetails(loan))
        .expect("patch applies");

    match wizard.begin_submission() {
        Err(WizardError::Blocked(blocked)) => {
            assert!(blocked
                .issues
                .iter()
                .any(|issue| issue.field == "loanDetails.guarantors"));
        }
        other => panic!("expected blocked submission, got {other:?}"),
    }
    assert!(!wizard.is_submitting());
    assert_eq!(wizard.step(), WizardStep::LoanDetails);
}

#[test]
fn submit_control_is_disabled_while_pending() {
    let mut wizard = wizard_on_loan_step(low_score_application());

    let payload = wizard.begin_submission().expect("validation passes");
    assert_eq!(payload, *wizard.data());
    assert!(wizard.is_submitting());
    assert!(matches!(
        wizard.begin_submission(),
        Err(WizardError::SubmissionInFlight)
    ));
    assert!(matches!(wizard.back(), Err(WizardError::SubmissionInFlight)));
}

#[test]
fn completing_without_pending_submission_is_rejected() {
    let mut wizard = wizard_on_loan_step(application());
    assert!(matches!(
        wizard.complete_submission(Err(SubmissionError::Rejected { status: 500 })),
        Err(WizardError::NoSubmissionInFlight)
    ));
}

#[tokio::test]
async fn successful_submission_is_terminal() {
    let mut wizard = wizard_on_loan_step(low_score_application());
    let gateway = InstantGateway::default();

    let receipt = wizard.submit(&gateway).await.expect("submission succeeds");

    assert_eq!(gateway.calls(), 1);
    assert_eq!(wizard.step(), WizardStep::Submitted);
    assert_eq!(wizard.receipt(), Some(&receipt));
    assert!(!wizard.is_submitting());
    assert_eq!(
        wizard.notification().map(|note| note.severity),
        Some(Severity::Success)
    );

    assert!(matches!(
        wizard.apply(ApplicationPatch::LoanDetails(loan_details())),
        Err(WizardError::Closed)
    ));
    assert!(matches!(wizard.back(), Err(WizardError::Closed)));
    assert!(matches!(wizard.next(), Err(WizardError::Closed)));
    assert!(matches!(
        wizard.submit(&gateway).await,
        Err(WizardError::Closed)
    ));
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn failed_submission_keeps_state_for_retry() {
    let mut wizard = wizard_on_loan_step(low_score_application());
    let before = wizard.data().clone();
    let failing = FailingGateway(SubmissionError::Rejected { status: 503 });

    match wizard.submit(&failing).await {
        Err(WizardError::Submission(SubmissionError::Rejected { status: 503 })) => {}
        other => panic!("expected rejected submission, got {other:?}"),
    }

    assert_eq!(wizard.step(), WizardStep::LoanDetails);
    assert!(!wizard.is_submitting());
    assert_eq!(*wizard.data(), before);
    let notification = wizard.notification().expect("failure is surfaced");
    assert_eq!(notification.severity, Severity::Error);
    assert_eq!(notification.message, SUBMISSION_FAILURE_MESSAGE);

    wizard.dismiss_notification();
    let retry = InstantGateway::default();
    wizard.submit(&retry).await.expect("retry succeeds");
    assert_eq!(wizard.step(), WizardStep::Submitted);
}

#[tokio::test(start_paused = true)]
async fn simulated_gateway_completes_submission_after_delay() {
    let mut wizard = wizard_on_loan_step(application());
    let gateway = SimulatedSubmissionGateway::new(Duration::from_millis(1500));
    let started = tokio::time::Instant::now();

    wizard.submit(&gateway).await.expect("simulated submission succeeds");

    assert!(started.elapsed() >= Duration::from_millis(1500));
    assert_eq!(wizard.step(), WizardStep::Submitted);
}

#[tokio::test(start_paused = true)]
async fn timed_out_submission_unlocks_the_session() {
    let mut wizard = wizard_on_loan_step(application());
    let slow = SimulatedSubmissionGateway::new(Duration::from_millis(1500));

    let timed_out =
        tokio::time::timeout(Duration::from_millis(10), wizard.submit(&slow)).await;

    assert!(timed_out.is_err());
    assert!(!wizard.is_submitting());
    assert_eq!(wizard.step(), WizardStep::LoanDetails);
    assert!(wizard.receipt().is_none());

    assert_eq!(wizard.back().expect("back allowed"), WizardStep::BusinessDetails);
    wizard.next().expect("business details still pass");
    let retry = InstantGateway::default();
    wizard.submit(&retry).await.expect("retry succeeds");
    assert_eq!(retry.calls(), 1);
    assert_eq!(wizard.step(), WizardStep::Submitted);
}

#[test]
fn abandoning_releases_the_submit_lock() {
    let mut wizard = wizard_on_loan_step(application());
    wizard.begin_submission().expect("validation passes");

    wizard.abandon_submission();

    assert!(!wizard.is_submitting());
    assert!(matches!(
        wizard.complete_submission(Err(SubmissionError::Rejected { status: 504 })),
        Err(WizardError::NoSubmissionInFlight)
    ));
    assert!(wizard.begin_submission().is_ok());
}

#[test]
fn blur_validation_tracks_field_errors() {
    let mut data = ApplicationData::default();
    data.business_details.directors[0].pan_number = "ABCDE".to_string();
    let mut wizard = LoanApplicationWizard::with_data(data);

    assert!(wizard.validate_field(FieldRef::DirectorPan(0)).is_err());
    assert!(matches!(
        wizard.field_error(FieldRef::DirectorPan(0)),
        Some(FieldError::Format(_))
    ));
    assert!(matches!(
        wizard.validate_field(FieldRef::DirectorPan(4)),
        Err(WizardError::UnknownField)
    ));

    let mut business = wizard.data().business_details.clone();
    business.directors[0].pan_number = VALID_PAN.to_string();
    wizard
        .apply(ApplicationPatch::BusinessDetails(business))
        .expect("patch applies");
    wizard
        .validate_field(FieldRef::DirectorPan(0))
        .expect("now valid");
    assert!(wizard.field_error(FieldRef::DirectorPan(0)).is_none());
}

#[test]
fn guarantor_relation_rules_apply_at_submission() {
    let mut wizard = wizard_on_loan_step(application());
    let mut loan = low_score_loan_details();
    loan.guarantors[0].relationship = Some(Relationship::Other);
    loan.guarantors[0].relation = None;
    wizard
        .apply(ApplicationPatch::LoanDetails(loan.clone()))
        .expect("patch applies");
    assert!(wizard.begin_submission().is_err());

    loan.guarantors[0].relationship = Some(Relationship::Father);
    wizard
        .apply(ApplicationPatch::LoanDetails(loan))
        .expect("patch applies");
    assert!(wizard.begin_submission().is_ok());
}
