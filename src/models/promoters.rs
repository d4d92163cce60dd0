use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ID_EXPIRY_NOTICE_DAYS: i32 = 30;
pub const DEFAULT_PASSPORT_EXPIRY_NOTICE_DAYS: i32 = 90;

/// SeaORM entity for the `promoters` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "promoters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name_en: String,
    pub name_ar: String,
    pub id_card_number: String,
    pub passport_number: Option<String>,
    pub id_card_url: Option<String>,
    pub passport_url: Option<String>,
    pub id_card_expiry_date: Option<Date>,
    pub passport_expiry_date: Option<Date>,
    /// How many days before the ID card expires an alert is raised.
    pub notify_days_before_id_expiry: i32,
    pub notify_days_before_passport_expiry: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::contracts::Entity")]
    Contracts,
}

impl Related<super::contracts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contracts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePromoter {
    pub name_en: String,
    pub name_ar: String,
    pub id_card_number: String,
    pub passport_number: Option<String>,
    pub id_card_url: Option<String>,
    pub passport_url: Option<String>,
    pub id_card_expiry_date: Option<Date>,
    pub passport_expiry_date: Option<Date>,
    pub notify_days_before_id_expiry: Option<i32>,
    pub notify_days_before_passport_expiry: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePromoter {
    pub name_en: Option<String>,
    pub name_ar: Option<String>,
    pub id_card_number: Option<String>,
    pub passport_number: Option<String>,
    pub id_card_url: Option<String>,
    pub passport_url: Option<String>,
    pub id_card_expiry_date: Option<Date>,
    pub passport_expiry_date: Option<Date>,
    pub notify_days_before_id_expiry: Option<i32>,
    pub notify_days_before_passport_expiry: Option<i32>,
}

/// Which identity document an expiry alert refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    IdCard,
    Passport,
}

/// A promoter document that expires within its notice window (or already has).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiringDocument {
    pub promoter_id: Uuid,
    pub name_en: String,
    pub name_ar: String,
    pub document: DocumentKind,
    pub expiry_date: Date,
    /// Negative when the document has already expired.
    pub days_remaining: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpiringQuery {
    /// Overrides each promoter's own notice window when given.
    pub days: Option<i64>,
}

/// Collect the documents that fall inside their notice window relative to `today`.
///
/// Results are ordered by days remaining, most urgent first.
pub fn expiring_documents(
    promoters: &[Model],
    today: Date,
    window_override: Option<i64>,
) -> Vec<ExpiringDocument> {
    let mut out = Vec::new();

    for p in promoters {
        let checks = [
            (
                DocumentKind::IdCard,
                p.id_card_expiry_date,
                p.notify_days_before_id_expiry,
            ),
            (
                DocumentKind::Passport,
                p.passport_expiry_date,
                p.notify_days_before_passport_expiry,
            ),
        ];

        for (document, expiry, notice_days) in checks {
            let Some(expiry_date) = expiry else { continue };
            let window = window_override.unwrap_or(i64::from(notice_days));
            let days_remaining = (expiry_date - today).num_days();
            if days_remaining <= window {
                out.push(ExpiringDocument {
                    promoter_id: p.id,
                    name_en: p.name_en.clone(),
                    name_ar: p.name_ar.clone(),
                    document,
                    expiry_date,
                    days_remaining,
                });
            }
        }
    }

    out.sort_by_key(|d| d.days_remaining);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn promoter(id_expiry: Option<Date>, passport_expiry: Option<Date>) -> Model {
        Model {
            id: Uuid::new_v4(),
            name_en: "Ahmed Said".to_string(),
            name_ar: "أحمد سعيد".to_string(),
            id_card_number: "12345678".to_string(),
            passport_number: None,
            id_card_url: None,
            passport_url: None,
            id_card_expiry_date: id_expiry,
            passport_expiry_date: passport_expiry,
            notify_days_before_id_expiry: DEFAULT_ID_EXPIRY_NOTICE_DAYS,
            notify_days_before_passport_expiry: DEFAULT_PASSPORT_EXPIRY_NOTICE_DAYS,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn uses_each_document_notice_window() {
        let today = date(2026, 1, 1);
        // ID in 20 days (inside 30), passport in 60 days (inside 90).
        let p = promoter(Some(date(2026, 1, 21)), Some(date(2026, 3, 2)));

        let found = expiring_documents(&[p], today, None);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].document, DocumentKind::IdCard);
        assert_eq!(found[0].days_remaining, 20);
        assert_eq!(found[1].document, DocumentKind::Passport);
    }

    #[test]
    fn ignores_documents_outside_window_and_missing_dates() {
        let today = date(2026, 1, 1);
        let p = promoter(Some(date(2026, 6, 1)), None);
        assert!(expiring_documents(&[p], today, None).is_empty());
    }

    #[test]
    fn override_window_and_expired_documents() {
        let today = date(2026, 1, 1);
        let expired = promoter(Some(date(2025, 12, 25)), None);
        let later = promoter(None, Some(date(2026, 1, 11)));

        let found = expiring_documents(&[later, expired], today, Some(5));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].days_remaining, -7);
    }
}
