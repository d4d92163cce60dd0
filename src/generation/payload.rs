//! Flattened contract payload handed to the automation service.
//!
//! The automation scenario branches on whether an image URL is present, and
//! string-manipulates every other field. So image URLs are either a real URL or
//! JSON `null`, and everything else is always a JSON string (possibly empty).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{contracts, parties, promoters};

pub const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationPayload {
    pub contract_id: String,
    pub contract_number: String,
    pub status: String,

    pub first_party_name_en: String,
    pub first_party_name_ar: String,
    pub first_party_crn: String,
    pub first_party_address_en: String,
    pub first_party_address_ar: String,

    pub second_party_name_en: String,
    pub second_party_name_ar: String,
    pub second_party_crn: String,
    pub second_party_address_en: String,
    pub second_party_address_ar: String,

    pub promoter_name_en: String,
    pub promoter_name_ar: String,
    pub id_card_number: String,
    pub passport_number: String,
    pub id_card_url: Option<String>,
    pub passport_url: Option<String>,

    pub start_date: String,
    pub end_date: String,
    pub email: String,
    pub job_title: String,
    pub work_location: String,
}

/// Trimmed text, or an empty string when absent.
pub fn text(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// A usable URL, or `None` when absent or blank. Never `Some("")`.
pub fn image_url(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

impl AutomationPayload {
    /// Assemble the payload from a contract and whatever related rows were found.
    ///
    /// Missing parties or promoter yield empty strings for their text fields and
    /// `null` for their image URLs.
    pub fn build(
        contract: &contracts::Model,
        first_party: Option<&parties::Model>,
        second_party: Option<&parties::Model>,
        promoter: Option<&promoters::Model>,
    ) -> Self {
        Self {
            contract_id: contract.id.to_string(),
            contract_number: text(Some(&contract.contract_number)),
            status: contract.status.as_str().to_string(),

            first_party_name_en: text(first_party.map(|p| p.name_en.as_str())),
            first_party_name_ar: text(first_party.map(|p| p.name_ar.as_str())),
            first_party_crn: text(first_party.map(|p| p.crn.as_str())),
            first_party_address_en: text(first_party.and_then(|p| p.address_en.as_deref())),
            first_party_address_ar: text(first_party.and_then(|p| p.address_ar.as_deref())),

            second_party_name_en: text(second_party.map(|p| p.name_en.as_str())),
            second_party_name_ar: text(second_party.map(|p| p.name_ar.as_str())),
            second_party_crn: text(second_party.map(|p| p.crn.as_str())),
            second_party_address_en: text(second_party.and_then(|p| p.address_en.as_deref())),
            second_party_address_ar: text(second_party.and_then(|p| p.address_ar.as_deref())),

            promoter_name_en: text(promoter.map(|p| p.name_en.as_str())),
            promoter_name_ar: text(promoter.map(|p| p.name_ar.as_str())),
            id_card_number: text(promoter.map(|p| p.id_card_number.as_str())),
            passport_number: text(promoter.and_then(|p| p.passport_number.as_deref())),
            id_card_url: image_url(promoter.and_then(|p| p.id_card_url.as_deref())),
            passport_url: image_url(promoter.and_then(|p| p.passport_url.as_deref())),

            start_date: format_date(contract.start_date),
            end_date: format_date(contract.end_date),
            email: text(Some(&contract.email)),
            job_title: text(contract.job_title.as_deref()),
            work_location: text(contract.work_location.as_deref()),
        }
    }
}

/// Body of the outbound trigger sent to the automation service on submission.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerRequest<'a> {
    pub contract_id: String,
    pub contract_number: &'a str,
    pub first_party_id: String,
    pub second_party_id: String,
    pub promoter_id: Option<String>,
}

impl<'a> TriggerRequest<'a> {
    pub fn for_contract(contract: &'a contracts::Model) -> Self {
        Self {
            contract_id: contract.id.to_string(),
            contract_number: &contract.contract_number,
            first_party_id: contract.first_party_id.to_string(),
            second_party_id: contract.second_party_id.to_string(),
            promoter_id: contract.promoter_id.map(|id| id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contracts::Status;
    use chrono::Utc;
    use uuid::Uuid;

    fn contract() -> contracts::Model {
        contracts::Model {
            id: Uuid::new_v4(),
            contract_number: "CNT-20260301-0F1E2D".to_string(),
            first_party_id: Uuid::new_v4(),
            second_party_id: Uuid::new_v4(),
            promoter_id: Some(Uuid::new_v4()),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2027, 2, 28).unwrap(),
            email: "ops@example.com".to_string(),
            job_title: None,
            work_location: Some("  Muscat ".to_string()),
            status: Status::Processing,
            pdf_url: None,
            error_message: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn party(name: &str) -> parties::Model {
        parties::Model {
            id: Uuid::new_v4(),
            name_en: name.to_string(),
            name_ar: "شركة".to_string(),
            crn: "1234567".to_string(),
            address_en: None,
            address_ar: None,
            contact_person: None,
            contact_email: None,
            contact_phone: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn promoter(id_card_url: Option<&str>, passport_url: Option<&str>) -> promoters::Model {
        promoters::Model {
            id: Uuid::new_v4(),
            name_en: "Sara Ali".to_string(),
            name_ar: "سارة علي".to_string(),
            id_card_number: "99887766".to_string(),
            passport_number: None,
            id_card_url: id_card_url.map(str::to_string),
            passport_url: passport_url.map(str::to_string),
            id_card_expiry_date: None,
            passport_expiry_date: None,
            notify_days_before_id_expiry: 30,
            notify_days_before_passport_expiry: 90,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn text_fields_are_always_strings() {
        let c = contract();
        let payload = AutomationPayload::build(&c, None, None, None);
        let json = serde_json::to_value(&payload).unwrap();

        for (key, value) in json.as_object().unwrap() {
            if key == "id_card_url" || key == "passport_url" {
                continue;
            }
            assert!(value.is_string(), "{key} should be a string, got {value}");
        }
        assert_eq!(json["job_title"], "");
        assert_eq!(json["work_location"], "Muscat");
        assert_eq!(json["first_party_name_en"], "");
    }

    #[test]
    fn missing_images_are_null_never_empty() {
        let c = contract();
        let p = promoter(Some(""), None);
        let payload = AutomationPayload::build(&c, None, None, Some(&p));
        let json = serde_json::to_value(&payload).unwrap();

        assert!(json["id_card_url"].is_null());
        assert!(json["passport_url"].is_null());
    }

    #[test]
    fn present_images_and_dates_are_passed_through() {
        let c = contract();
        let first = party("Falcon Trading LLC");
        let second = party("Desert Retail SAOC");
        let p = promoter(Some("https://cdn/id.png"), Some("https://cdn/pass.png"));

        let payload = AutomationPayload::build(&c, Some(&first), Some(&second), Some(&p));
        assert_eq!(payload.id_card_url.as_deref(), Some("https://cdn/id.png"));
        assert_eq!(payload.passport_url.as_deref(), Some("https://cdn/pass.png"));
        assert_eq!(payload.first_party_name_en, "Falcon Trading LLC");
        assert_eq!(payload.second_party_crn, "1234567");
        assert_eq!(payload.start_date, "01-03-2026");
        assert_eq!(payload.end_date, "28-02-2027");
        assert_eq!(payload.status, "processing");
    }
}
