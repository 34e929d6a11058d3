use loan_wizard::error::AppError;
use loan_wizard::workflows::loan_application::{
    ApplicationData, BankStatement, BusinessDetails, Director, DirectorTag, Guarantor,
    LoanDetails, Relationship,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Read an application payload (camelCase JSON) from disk.
pub(crate) fn load_application(path: &Path) -> Result<ApplicationData, AppError> {
    let raw = std::fs::read(path)?;
    Ok(serde_json::from_slice(&raw)?)
}

/// Embed a statement file, guessing its media type from the extension.
pub(crate) fn attach_statement(data: &mut ApplicationData, path: &Path) -> Result<(), AppError> {
    let bytes = std::fs::read(path)?;
    let media_type = mime_guess::from_path(path).first_or_octet_stream();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    debug!(%file_name, media_type = %media_type, bytes = bytes.len(), "attaching bank statement");
    let statement = BankStatement::from_bytes(file_name, &media_type, &bytes)?;
    data.loan_details.bank_statements.push(statement);
    Ok(())
}

pub(crate) fn sample_business_details() -> BusinessDetails {
    BusinessDetails {
        business_name: "Sahyadri Foods LLP".to_string(),
        gstin: "27ABCDE1234F1Z5".to_string(),
        directors: vec![
            Director {
                name: "Kavya Iyer".to_string(),
                pan_number: "KLMNO4321P".to_string(),
                tags: vec![DirectorTag::Director, DirectorTag::AuthorizedSignatory],
            },
            Director {
                name: "Arjun Iyer".to_string(),
                pan_number: "BCDEF6543G".to_string(),
                tags: vec![DirectorTag::Director],
            },
        ],
    }
}

pub(crate) fn sample_guarantors() -> Vec<Guarantor> {
    vec![
        Guarantor {
            name: "Suresh Iyer".to_string(),
            pan_number: "QRSTU1111V".to_string(),
            relationship: Some(Relationship::Father),
            relation: None,
        },
        Guarantor {
            name: "Nisha Menon".to_string(),
            pan_number: "WXYZA2222B".to_string(),
            relationship: Some(Relationship::Other),
            relation: Some("Business partner".to_string()),
        },
    ]
}

/// A one-line PDF, already encoded.
pub(crate) fn sample_statement() -> BankStatement {
    BankStatement {
        file_name: "statement-2025-09.pdf".to_string(),
        media_type: "application/pdf".to_string(),
        data_url: "data:application/pdf;base64,JVBERi0xLjcK".to_string(),
    }
}

pub(crate) fn sample_loan_details(credit_score: u16) -> LoanDetails {
    let mut details = LoanDetails {
        credit_score: Some(f64::from(credit_score)),
        required_loan_amount: Some(350_000.0),
        guarantors: Vec::new(),
        bank_statements: Vec::new(),
    };
    if details.requires_guarantors() {
        details.guarantors = sample_guarantors();
        details.bank_statements = vec![sample_statement()];
    }
    details
}

#[cfg(test)]
pub(crate) fn sample_application() -> ApplicationData {
    ApplicationData {
        business_details: sample_business_details(),
        loan_details: sample_loan_details(650),
    }
}
