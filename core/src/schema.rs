//! Whole-form validation for contact input.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::ContactFormData;
use crate::validation::{validate_field, Field};

/// One message per invalid field, keyed by field.
pub type FieldErrors = BTreeMap<Field, String>;

/// Outcome of validating a whole form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ValidationResult {
    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors.as_ref()?.get(&field).map(String::as_str)
    }
}

/// Declarative validator for `ContactFormData`.
///
/// Unlike the field validator it collects every violation instead of
/// stopping at the first invalid field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactSchema;

impl ContactSchema {
    pub fn validate(&self, data: &ContactFormData) -> ValidationResult {
        let data = data.normalized();
        let errors: FieldErrors = Field::ALL
            .iter()
            .filter_map(|&field| {
                let value = match field {
                    Field::Name => &data.name,
                    Field::PhoneNumber => &data.phone_number,
                };
                validate_field(field, value).map(|msg| (field, msg.to_string()))
            })
            .collect();

        if errors.is_empty() {
            ValidationResult {
                success: true,
                errors: None,
            }
        } else {
            ValidationResult {
                success: false,
                errors: Some(errors),
            }
        }
    }

    /// Whether a form may be submitted; drives the submit button state.
    pub fn is_complete(&self, data: &ContactFormData) -> bool {
        self.validate(data).success
    }
}
