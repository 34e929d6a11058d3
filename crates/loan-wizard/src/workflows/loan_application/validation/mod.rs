//! Field rules shared by both wizard steps and the intake endpoint.
//!
//! Every rule returns `Ok(())` for an acceptable value or the most specific
//! [`FieldError`] it can produce. Rules never panic on malformed input.

mod identifiers;
mod ranges;

pub use identifiers::{validate_pan, validate_tax_id};
pub use ranges::{
    validate_business_name, validate_credit_score, validate_loan_amount, validate_person_name,
    validate_relation, CREDIT_SCORE_RANGE, LOAN_AMOUNT_RANGE,
};

pub use super::documents::validate_bank_statement;

/// Diagnostic produced by a single field rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be at least {min} characters long")]
    TooShort { field: &'static str, min: usize },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
    },
    #[error(transparent)]
    Format(#[from] FormatViolation),
    #[error("unsupported file type '{0}'; upload a PDF, JPEG or PNG")]
    UnsupportedMediaType(String),
    #[error("'{0}' is not a base64 data URL")]
    MalformedDataUrl(String),
}

impl FieldError {
    /// Omissions and format problems share handling but read differently.
    pub fn is_omission(&self) -> bool {
        matches!(self, FieldError::Required(_))
    }
}

/// Positional diagnostics for the identifier patterns, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormatViolation {
    #[error("GSTIN must start with 2 digits representing state code")]
    TaxIdStateCode,
    #[error("GSTIN must have 5 uppercase letters after state code")]
    TaxIdLetters,
    #[error("GSTIN must have 4 digits after the letters")]
    TaxIdDigits,
    #[error("GSTIN must contain 'Z'")]
    TaxIdMarker,
    #[error("Invalid GSTIN format. Example: 22AAAAA0000A1Z5")]
    TaxId,
    #[error("PAN must start with 5 uppercase letters")]
    PanLetters,
    #[error("PAN must have 4 digits after the first 5 letters")]
    PanDigits,
    #[error("PAN must end with an uppercase letter. Example: ABCDE1234F")]
    PanSuffix,
}
