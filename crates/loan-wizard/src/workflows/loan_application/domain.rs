use serde::{Deserialize, Serialize};

use super::documents::BankStatement;

/// Scores strictly below this value must be backed by guarantors and bank statements.
pub const GUARANTOR_CREDIT_THRESHOLD: u16 = 700;
pub const MINIMUM_GUARANTORS: usize = 2;

const SAMPLE_CREDIT_SCORE: f64 = 750.0;
const SAMPLE_LOAN_AMOUNT: f64 = 200_000.0;

/// Consolidated payload covering both wizard steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationData {
    pub business_details: BusinessDetails,
    pub loan_details: LoanDetails,
}

/// Registration details captured on the first step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDetails {
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub gstin: String,
    #[serde(default)]
    pub directors: Vec<Director>,
}

impl Default for BusinessDetails {
    /// The wizard opens with a single blank director row.
    fn default() -> Self {
        Self {
            business_name: String::new(),
            gstin: String::new(),
            directors: vec![Director::default()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Director {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pan_number: String,
    #[serde(default)]
    pub tags: Vec<DirectorTag>,
}

/// Roles a director can hold within the applying business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DirectorTag {
    Director,
    #[serde(rename = "Authorized Signatory")]
    AuthorizedSignatory,
}

impl DirectorTag {
    pub const fn label(self) -> &'static str {
        match self {
            DirectorTag::Director => "Director",
            DirectorTag::AuthorizedSignatory => "Authorized Signatory",
        }
    }
}

/// Loan request captured on the second step.
///
/// Amounts are plain JSON numbers; anything numeric deserializes so the range rules can
/// report it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDetails {
    #[serde(default)]
    pub credit_score: Option<f64>,
    #[serde(default)]
    pub required_loan_amount: Option<f64>,
    #[serde(default)]
    pub guarantors: Vec<Guarantor>,
    #[serde(default)]
    pub bank_statements: Vec<BankStatement>,
}

impl Default for LoanDetails {
    fn default() -> Self {
        Self {
            credit_score: Some(SAMPLE_CREDIT_SCORE),
            required_loan_amount: Some(SAMPLE_LOAN_AMOUNT),
            guarantors: Vec::new(),
            bank_statements: Vec::new(),
        }
    }
}

impl LoanDetails {
    /// Whether the guarantor and bank-statement requirements apply at submission.
    pub fn requires_guarantors(&self) -> bool {
        matches!(self.credit_score, Some(score) if score < f64::from(GUARANTOR_CREDIT_THRESHOLD))
    }

    pub fn credit_band(&self) -> CreditBand {
        CreditBand::from_score(self.credit_score)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guarantor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pan_number: String,
    #[serde(default)]
    pub relationship: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

/// Relationship of a guarantor to the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    Father,
    Mother,
    Brother,
    Sister,
    Spouse,
    Other,
}

impl Relationship {
    pub const ALL: [Relationship; 6] = [
        Relationship::Father,
        Relationship::Mother,
        Relationship::Brother,
        Relationship::Sister,
        Relationship::Spouse,
        Relationship::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Relationship::Father => "Father",
            Relationship::Mother => "Mother",
            Relationship::Brother => "Brother",
            Relationship::Sister => "Sister",
            Relationship::Spouse => "Spouse",
            Relationship::Other => "Other",
        }
    }

    /// `Other` must be spelled out in the free-text relation field.
    pub const fn requires_relation(self) -> bool {
        matches!(self, Relationship::Other)
    }
}

/// Coarse credit-score grading shown next to the score input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditBand {
    Unknown,
    Poor,
    Fair,
    Good,
}

impl CreditBand {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => CreditBand::Unknown,
            Some(score) if score <= 0.0 => CreditBand::Unknown,
            Some(score) if score >= f64::from(GUARANTOR_CREDIT_THRESHOLD) => CreditBand::Good,
            Some(score) if score >= 600.0 => CreditBand::Fair,
            Some(_) => CreditBand::Poor,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CreditBand::Unknown => "Enter your credit score",
            CreditBand::Poor => "Poor credit score - At least 2 Guarantors required",
            CreditBand::Fair => "Fair credit score",
            CreditBand::Good => "Good credit score",
        }
    }
}
