#![allow(dead_code)]

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use contracthub_backend::db::{parties as party_db, promoters as promoter_db};
use contracthub_backend::models::contracts::CreateContract;
use contracthub_backend::models::parties::{self, CreateParty};
use contracthub_backend::models::promoters::{self, CreatePromoter};

/// Fresh in-memory database with every migration applied.
pub async fn test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn party(db: &DatabaseConnection, name_en: &str, name_ar: &str, crn: &str) -> parties::Model {
    party_db::insert_party(
        db,
        CreateParty {
            name_en: name_en.to_string(),
            name_ar: name_ar.to_string(),
            crn: crn.to_string(),
            address_en: Some("Al Khuwair, Muscat".to_string()),
            address_ar: None,
            contact_person: None,
            contact_email: None,
            contact_phone: None,
        },
    )
    .await
    .expect("Failed to insert party")
}

/// Promoter with an ID card scan but no passport scan.
pub async fn promoter(db: &DatabaseConnection) -> promoters::Model {
    promoter_db::insert_promoter(
        db,
        CreatePromoter {
            name_en: "Salim Al Harthy".to_string(),
            name_ar: "سالم الحارثي".to_string(),
            id_card_number: "98765432".to_string(),
            passport_number: None,
            id_card_url: Some("https://files.example.com/id/98765432.png".to_string()),
            passport_url: Some("   ".to_string()),
            id_card_expiry_date: None,
            passport_expiry_date: None,
            notify_days_before_id_expiry: None,
            notify_days_before_passport_expiry: None,
        },
    )
    .await
    .expect("Failed to insert promoter")
}

pub fn submission(first: Uuid, second: Uuid, promoter: Option<Uuid>) -> CreateContract {
    CreateContract {
        first_party_id: first,
        second_party_id: second,
        promoter_id: promoter,
        start_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2027, 10, 31).unwrap(),
        email: "hr@falcon.om".to_string(),
        job_title: Some("Sales Promoter".to_string()),
        work_location: None,
    }
}

/// Two distinct parties and a promoter, ready for a valid submission.
pub async fn seeded(db: &DatabaseConnection) -> (parties::Model, parties::Model, promoters::Model) {
    let first = party(db, "Falcon Trading LLC", "شركة الصقر للتجارة", "1234567").await;
    let second = party(db, "Oasis Retail", "الواحة للتجزئة", "7654321").await;
    let promoter = promoter(db).await;
    (first, second, promoter)
}
