use super::domain::{ApplicationData, BusinessDetails, LoanDetails};

/// A sub-form's full current state, as reported on change.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationPatch {
    BusinessDetails(BusinessDetails),
    LoanDetails(LoanDetails),
}

impl ApplicationPatch {
    pub const fn section(&self) -> &'static str {
        match self {
            ApplicationPatch::BusinessDetails(_) => "businessDetails",
            ApplicationPatch::LoanDetails(_) => "loanDetails",
        }
    }
}

impl ApplicationData {
    /// Shallow merge: the patched section is replaced wholesale, the other is kept.
    pub fn merged(&self, patch: ApplicationPatch) -> ApplicationData {
        match patch {
            ApplicationPatch::BusinessDetails(business_details) => ApplicationData {
                business_details,
                loan_details: self.loan_details.clone(),
            },
            ApplicationPatch::LoanDetails(loan_details) => ApplicationData {
                business_details: self.business_details.clone(),
                loan_details,
            },
        }
    }
}

pub fn merge(current: &ApplicationData, patch: ApplicationPatch) -> ApplicationData {
    current.merged(patch)
}
