use std::sync::LazyLock;

use regex::Regex;

use super::{FieldError, FormatViolation};

static TAX_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").expect("Invalid GSTIN pattern")
});
static TAX_ID_STATE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}").expect("Invalid GSTIN state code pattern"));
static TAX_ID_LETTER_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}[A-Z]{5}").expect("Invalid GSTIN letter pattern"));
static TAX_ID_DIGIT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}").expect("Invalid GSTIN digit pattern")
});

static PAN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("Invalid PAN pattern"));
static PAN_LETTER_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}").expect("Invalid PAN letter pattern"));
static PAN_DIGIT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}").expect("Invalid PAN digit pattern"));

const TAX_ID_MARKER: char = 'Z';

/// Checks a 15-character GSTIN, reporting the first block that is out of shape.
pub fn validate_tax_id(value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::Required("GSTIN"));
    }

    if TAX_ID_PATTERN.is_match(value) {
        return Ok(());
    }

    let violation = if !TAX_ID_STATE_CODE.is_match(value) {
        FormatViolation::TaxIdStateCode
    } else if !TAX_ID_LETTER_BLOCK.is_match(value) {
        FormatViolation::TaxIdLetters
    } else if !TAX_ID_DIGIT_BLOCK.is_match(value) {
        FormatViolation::TaxIdDigits
    } else if !value.contains(TAX_ID_MARKER) {
        FormatViolation::TaxIdMarker
    } else {
        FormatViolation::TaxId
    };

    Err(violation.into())
}

/// Checks a 10-character PAN: five letters, four digits, one letter.
pub fn validate_pan(value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::Required("PAN Number"));
    }

    if PAN_PATTERN.is_match(value) {
        return Ok(());
    }

    let violation = if !PAN_LETTER_BLOCK.is_match(value) {
        FormatViolation::PanLetters
    } else if !PAN_DIGIT_BLOCK.is_match(value) {
        FormatViolation::PanDigits
    } else {
        FormatViolation::PanSuffix
    };

    Err(violation.into())
}
