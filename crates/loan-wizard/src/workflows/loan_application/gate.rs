use std::fmt;

use serde::Serialize;

use super::domain::{ApplicationData, BusinessDetails, Guarantor, LoanDetails, MINIMUM_GUARANTORS};
use super::validation::{
    validate_bank_statement, validate_business_name, validate_credit_score, validate_loan_amount,
    validate_pan, validate_person_name, validate_relation, validate_tax_id, FieldError,
};
use super::wizard::WizardStep;

/// One message surfaced in the step banner, keyed by its payload path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn from_error(field: impl Into<String>, error: &FieldError) -> Self {
        Self::new(field, error.to_string())
    }

    fn for_director(index: usize, field: &str, error: &FieldError) -> Self {
        Self::new(
            format!("businessDetails.directors[{index}].{field}"),
            format!("Director {}: {error}", index + 1),
        )
    }

    fn for_guarantor(index: usize, field: &str, error: &FieldError) -> Self {
        Self::new(
            format!("loanDetails.guarantors[{index}].{field}"),
            format!("Guarantor {}: {error}", index + 1),
        )
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A transition refused because the step's checks did not pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} blocked by {} issue(s): {}", .step.label(), .issues.len(), summarize(.issues))]
pub struct StepBlocked {
    pub step: WizardStep,
    pub issues: Vec<ValidationIssue>,
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn blocked_unless_empty(step: WizardStep, issues: Vec<ValidationIssue>) -> Result<(), StepBlocked> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(StepBlocked { step, issues })
    }
}

/// Gate for leaving the business step: GSTIN plus every director's PAN.
pub fn check_business_details(details: &BusinessDetails) -> Result<(), StepBlocked> {
    blocked_unless_empty(WizardStep::BusinessDetails, business_details_issues(details))
}

/// Gate for submission. Guarantor rules only apply below the credit threshold.
pub fn check_loan_details(details: &LoanDetails) -> Result<(), StepBlocked> {
    blocked_unless_empty(WizardStep::LoanDetails, loan_details_issues(details))
}

/// Full server-side check: both step gates plus the name rules the form enforces inline.
pub fn check_application(data: &ApplicationData) -> Result<(), StepBlocked> {
    let business = business_details_issues(&data.business_details);
    if !business.is_empty() {
        return Err(StepBlocked {
            step: WizardStep::BusinessDetails,
            issues: business,
        });
    }

    let mut issues = loan_details_issues(&data.loan_details);
    issues.extend(profile_issues(data));
    blocked_unless_empty(WizardStep::LoanDetails, issues)
}

pub fn business_details_issues(details: &BusinessDetails) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Err(error) = validate_tax_id(&details.gstin) {
        issues.push(ValidationIssue::from_error("businessDetails.gstin", &error));
    }

    if details.directors.is_empty() {
        issues.push(ValidationIssue::new(
            "businessDetails.directors",
            "At least one director with a valid PAN Number is required",
        ));
    }

    for (index, director) in details.directors.iter().enumerate() {
        if let Err(error) = validate_pan(&director.pan_number) {
            issues.push(ValidationIssue::for_director(index, "panNumber", &error));
        }
    }

    issues
}

pub fn loan_details_issues(details: &LoanDetails) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Err(error) = validate_credit_score(details.credit_score) {
        issues.push(ValidationIssue::from_error("loanDetails.creditScore", &error));
    }

    if let Err(error) = validate_loan_amount(details.required_loan_amount) {
        issues.push(ValidationIssue::from_error(
            "loanDetails.requiredLoanAmount",
            &error,
        ));
    }

    for (index, statement) in details.bank_statements.iter().enumerate() {
        if let Err(error) = validate_bank_statement(statement) {
            issues.push(ValidationIssue::from_error(
                format!("loanDetails.bankStatements[{index}]"),
                &error,
            ));
        }
    }

    if !details.requires_guarantors() {
        return issues;
    }

    if details.guarantors.len() < MINIMUM_GUARANTORS {
        issues.push(ValidationIssue::new(
            "loanDetails.guarantors",
            format!(
                "At least {MINIMUM_GUARANTORS} guarantors are required when the credit score is below 700"
            ),
        ));
    }

    if details.bank_statements.is_empty() {
        issues.push(ValidationIssue::new(
            "loanDetails.bankStatements",
            "Bank statements for the last 6 months are required when the credit score is below 700",
        ));
    }

    if let Some(issue) = first_guarantor_issue(&details.guarantors) {
        issues.push(issue);
    }

    issues
}

/// Guarantors are checked in order and the first failure ends the scan.
fn first_guarantor_issue(guarantors: &[Guarantor]) -> Option<ValidationIssue> {
    guarantors
        .iter()
        .enumerate()
        .find_map(|(index, guarantor)| {
            if let Err(error) = validate_pan(&guarantor.pan_number) {
                return Some(ValidationIssue::for_guarantor(index, "panNumber", &error));
            }
            validate_relation(guarantor.relationship, guarantor.relation.as_deref())
                .err()
                .map(|error| {
                    let field = if guarantor.relationship.is_some() {
                        "relation"
                    } else {
                        "relationship"
                    };
                    ValidationIssue::for_guarantor(index, field, &error)
                })
        })
}

fn profile_issues(data: &ApplicationData) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Err(error) = validate_business_name(&data.business_details.business_name) {
        issues.push(ValidationIssue::from_error(
            "businessDetails.businessName",
            &error,
        ));
    }

    for (index, director) in data.business_details.directors.iter().enumerate() {
        if let Err(error) = validate_person_name(&director.name) {
            issues.push(ValidationIssue::for_director(index, "name", &error));
        }
    }

    if data.loan_details.requires_guarantors() {
        for (index, guarantor) in data.loan_details.guarantors.iter().enumerate() {
            if let Err(error) = validate_person_name(&guarantor.name) {
                issues.push(ValidationIssue::for_guarantor(index, "name", &error));
            }
        }
    }

    issues
}
