use thiserror::Error;

use crate::models::form::{FormField, ProjectForm};

/// Required scalar fields, in the order they are checked.
pub const REQUIRED_FIELDS: [FormField; 12] = [
    FormField::Name,
    FormField::Manager,
    FormField::Client,
    FormField::Partner,
    FormField::Status,
    FormField::Practice,
    FormField::Category,
    FormField::BillingType,
    FormField::BudgetedHours,
    FormField::StartDate,
    FormField::EndDate,
    FormField::KeepResourcesAvailable,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill out the \"{}\" field.", .0.key())]
    MissingField(FormField),

    #[error("Please add at least one technology.")]
    NoTechnology,
}

/// Checks that a form is complete enough to submit.
///
/// Only the first failure is reported. Required scalars are checked before
/// the technology list.
pub fn validate_form(form: &ProjectForm) -> Result<(), FormError> {
    if let Some(field) = REQUIRED_FIELDS.iter().copied().find(|f| !form.is_set(*f)) {
        return Err(FormError::MissingField(field));
    }

    if form.technology.is_empty() {
        return Err(FormError::NoTechnology);
    }

    Ok(())
}
