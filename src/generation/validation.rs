use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::contracts::CreateContract;
use crate::models::parties::{CreateParty, UpdateParty};
use crate::models::promoters::{CreatePromoter, UpdatePromoter};

/// Field name -> human-readable message, returned to the form as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        // First message for a field wins.
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        f.write_str(&parts.join(", "))
    }
}

/// Loose shape check; the mail server is the real validator.
pub fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn require(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("{field} is required"));
    }
}

fn require_if_present(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    if let Some(v) = value {
        require(errors, field, v);
    }
}

/// Shape checks on a contract submission that need no database access.
pub fn validate_contract(input: &CreateContract) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if input.first_party_id == input.second_party_id {
        errors.add(
            "second_party_id",
            "The second party must be different from the first party",
        );
    }

    if input.end_date < input.start_date {
        errors.add("end_date", "End date must be on or after the start date");
    }

    if !looks_like_email(&input.email) {
        errors.add("email", "A valid contact email is required");
    }

    errors.into_result()
}

pub fn validate_new_party(input: &CreateParty) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "name_en", &input.name_en);
    require(&mut errors, "name_ar", &input.name_ar);
    require(&mut errors, "crn", &input.crn);
    if let Some(email) = input.contact_email.as_deref().filter(|e| !e.trim().is_empty()) {
        if !looks_like_email(email) {
            errors.add("contact_email", "Contact email is not valid");
        }
    }
    errors.into_result()
}

pub fn validate_party_update(input: &UpdateParty) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require_if_present(&mut errors, "name_en", input.name_en.as_deref());
    require_if_present(&mut errors, "name_ar", input.name_ar.as_deref());
    require_if_present(&mut errors, "crn", input.crn.as_deref());
    if let Some(email) = input.contact_email.as_deref().filter(|e| !e.trim().is_empty()) {
        if !looks_like_email(email) {
            errors.add("contact_email", "Contact email is not valid");
        }
    }
    errors.into_result()
}

fn check_notice_days(errors: &mut FieldErrors, field: &str, value: Option<i32>) {
    if let Some(days) = value {
        if days <= 0 {
            errors.add(field, format!("{field} must be a positive number of days"));
        }
    }
}

pub fn validate_new_promoter(input: &CreatePromoter) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require(&mut errors, "name_en", &input.name_en);
    require(&mut errors, "name_ar", &input.name_ar);
    require(&mut errors, "id_card_number", &input.id_card_number);
    check_notice_days(
        &mut errors,
        "notify_days_before_id_expiry",
        input.notify_days_before_id_expiry,
    );
    check_notice_days(
        &mut errors,
        "notify_days_before_passport_expiry",
        input.notify_days_before_passport_expiry,
    );
    errors.into_result()
}

pub fn validate_promoter_update(input: &UpdatePromoter) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require_if_present(&mut errors, "name_en", input.name_en.as_deref());
    require_if_present(&mut errors, "name_ar", input.name_ar.as_deref());
    require_if_present(&mut errors, "id_card_number", input.id_card_number.as_deref());
    check_notice_days(
        &mut errors,
        "notify_days_before_id_expiry",
        input.notify_days_before_id_expiry,
    );
    check_notice_days(
        &mut errors,
        "notify_days_before_passport_expiry",
        input.notify_days_before_passport_expiry,
    );
    errors.into_result()
}
