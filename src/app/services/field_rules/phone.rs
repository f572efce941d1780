//! Telephone and remarks consolidation

use super::{FieldOutcome, clean_text};
use crate::constants::PHONE_REMARKS_SEPARATOR;

/// `telephone` or `telephone - remarks` when remarks are present
pub fn combine_phone_remarks(telephone: &str, remarks: &str) -> FieldOutcome {
    let telephone = clean_text(telephone);
    let remarks = clean_text(remarks);

    let value = if remarks.is_empty() {
        telephone.clone()
    } else {
        format!("{}{}{}", telephone, PHONE_REMARKS_SEPARATOR, remarks)
    };

    if telephone.is_empty() {
        FieldOutcome::failed(value, "telephone is empty")
    } else {
        FieldOutcome::ok(value)
    }
}
