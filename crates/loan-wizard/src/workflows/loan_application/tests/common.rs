use std::sync::atomic::{AtomicUsize, Ordering};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::loan_application::documents::BankStatement;
use crate::workflows::loan_application::domain::{
    ApplicationData, BusinessDetails, Director, DirectorTag, Guarantor, LoanDetails, Relationship,
};
use crate::workflows::loan_application::submission::{
    SubmissionError, SubmissionGateway, SubmissionReceipt,
};
use crate::workflows::loan_application::wizard::LoanApplicationWizard;

pub(super) const VALID_GSTIN: &str = "22AAAAA0000A1Z5";
pub(super) const VALID_PAN: &str = "ABCDE1234F";

pub(super) fn director(name: &str, pan: &str) -> Director {
    Director {
        name: name.to_string(),
        pan_number: pan.to_string(),
        tags: vec![DirectorTag::Director, DirectorTag::AuthorizedSignatory],
    }
}

pub(super) fn business_details() -> BusinessDetails {
    BusinessDetails {
        business_name: "Acme Traders Pvt Ltd".to_string(),
        gstin: VALID_GSTIN.to_string(),
        directors: vec![director("Asha Rao", VALID_PAN)],
    }
}

pub(super) fn guarantor(name: &str, pan: &str, relationship: Relationship) -> Guarantor {
    Guarantor {
        name: name.to_string(),
        pan_number: pan.to_string(),
        relationship: Some(relationship),
        relation: None,
    }
}

pub(super) fn statement() -> BankStatement {
    BankStatement::from_bytes(
        "statement-2025-09.pdf",
        &mime::APPLICATION_PDF,
        b"%PDF-1.7 sample statement",
    )
    .expect("pdf statement encodes")
}

pub(super) fn loan_details() -> LoanDetails {
    LoanDetails {
        credit_score: Some(760.0),
        required_loan_amount: Some(250_000.0),
        guarantors: Vec::new(),
        bank_statements: Vec::new(),
    }
}

/// Credit below the threshold with every conditional requirement satisfied.
pub(super) fn low_score_loan_details() -> LoanDetails {
    let mut uncle = guarantor("Ravi Rao", "PQRST6789K", Relationship::Other);
    uncle.relation = Some("Uncle".to_string());

    LoanDetails {
        credit_score: Some(650.0),
        required_loan_amount: Some(300_000.0),
        guarantors: vec![guarantor("Mohan Rao", "FGHIJ5678L", Relationship::Father), uncle],
        bank_statements: vec![statement()],
    }
}

pub(super) fn application() -> ApplicationData {
    ApplicationData {
        business_details: business_details(),
        loan_details: loan_details(),
    }
}

pub(super) fn low_score_application() -> ApplicationData {
    ApplicationData {
        business_details: business_details(),
        loan_details: low_score_loan_details(),
    }
}

pub(super) fn wizard_on_loan_step(data: ApplicationData) -> LoanApplicationWizard {
    let mut wizard = LoanApplicationWizard::with_data(data);
    wizard.next().expect("business details pass the gate");
    wizard
}

/// Gateway that accepts immediately and counts calls.
#[derive(Default)]
pub(super) struct InstantGateway {
    calls: AtomicUsize,
}

impl InstantGateway {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl SubmissionGateway for InstantGateway {
    async fn submit(
        &self,
        _payload: &ApplicationData,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(SubmissionReceipt::issue(
            chrono::NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date"),
        ))
    }
}

pub(super) struct FailingGateway(pub(super) SubmissionError);

impl SubmissionGateway for FailingGateway {
    async fn submit(
        &self,
        _payload: &ApplicationData,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        Err(self.0.clone())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
