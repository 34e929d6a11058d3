use std::ops::RangeInclusive;

use super::FieldError;
use crate::workflows::loan_application::domain::Relationship;

pub const CREDIT_SCORE_RANGE: RangeInclusive<u16> = 300..=900;
pub const LOAN_AMOUNT_RANGE: RangeInclusive<u32> = 50_000..=500_000;

const BUSINESS_NAME_MIN_CHARS: usize = 3;
const PERSON_NAME_MIN_CHARS: usize = 2;
const RELATION_MIN_CHARS: usize = 2;

/// A zero score counts as missing, same as a cleared input.
pub fn validate_credit_score(value: Option<f64>) -> Result<(), FieldError> {
    require_within("Credit Score", value, &widen(&CREDIT_SCORE_RANGE))
}

pub fn validate_loan_amount(value: Option<f64>) -> Result<(), FieldError> {
    require_within("Required Loan Amount", value, &widen(&LOAN_AMOUNT_RANGE))
}

fn widen<T: Copy + Into<f64>>(range: &RangeInclusive<T>) -> RangeInclusive<f64> {
    (*range.start()).into()..=(*range.end()).into()
}

fn require_within(
    field: &'static str,
    value: Option<f64>,
    range: &RangeInclusive<f64>,
) -> Result<(), FieldError> {
    match value {
        None => Err(FieldError::Required(field)),
        Some(number) if number == 0.0 => Err(FieldError::Required(field)),
        Some(number) if range.contains(&number) => Ok(()),
        Some(_) => Err(FieldError::OutOfRange {
            field,
            min: *range.start() as u32,
            max: *range.end() as u32,
        }),
    }
}

pub fn validate_business_name(value: &str) -> Result<(), FieldError> {
    require_min_chars("Business Name", value, BUSINESS_NAME_MIN_CHARS)
}

/// Director and guarantor names.
pub fn validate_person_name(value: &str) -> Result<(), FieldError> {
    require_min_chars("Name", value, PERSON_NAME_MIN_CHARS)
}

/// The free-text relation only matters once `Other` is selected.
pub fn validate_relation(
    relationship: Option<Relationship>,
    relation: Option<&str>,
) -> Result<(), FieldError> {
    match relationship {
        None => Err(FieldError::Required("Relationship")),
        Some(kind) if kind.requires_relation() => {
            require_min_chars("Relation", relation.unwrap_or_default(), RELATION_MIN_CHARS)
        }
        Some(_) => Ok(()),
    }
}

fn require_min_chars(field: &'static str, value: &str, min: usize) -> Result<(), FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required(field));
    }
    if trimmed.chars().count() < min {
        return Err(FieldError::TooShort { field, min });
    }
    Ok(())
}
