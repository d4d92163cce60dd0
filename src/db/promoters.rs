use sea_orm::*;
use uuid::Uuid;

use crate::models::promoters::{
    self, CreatePromoter, DEFAULT_ID_EXPIRY_NOTICE_DAYS, DEFAULT_PASSPORT_EXPIRY_NOTICE_DAYS,
    UpdatePromoter,
};

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Insert a new promoter.
///
/// Blank document URLs are stored as NULL so that "no image" has one representation.
pub async fn insert_promoter(
    db: &DatabaseConnection,
    input: CreatePromoter,
) -> Result<promoters::Model, DbErr> {
    let new_promoter = promoters::ActiveModel {
        id: Set(Uuid::new_v4()),
        name_en: Set(input.name_en.trim().to_string()),
        name_ar: Set(input.name_ar.trim().to_string()),
        id_card_number: Set(input.id_card_number.trim().to_string()),
        passport_number: Set(trimmed(input.passport_number)),
        id_card_url: Set(trimmed(input.id_card_url)),
        passport_url: Set(trimmed(input.passport_url)),
        id_card_expiry_date: Set(input.id_card_expiry_date),
        passport_expiry_date: Set(input.passport_expiry_date),
        notify_days_before_id_expiry: Set(input
            .notify_days_before_id_expiry
            .unwrap_or(DEFAULT_ID_EXPIRY_NOTICE_DAYS)),
        notify_days_before_passport_expiry: Set(input
            .notify_days_before_passport_expiry
            .unwrap_or(DEFAULT_PASSPORT_EXPIRY_NOTICE_DAYS)),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_promoter.insert(db).await
}

/// List promoters alphabetically.
pub async fn get_promoters(
    db: &DatabaseConnection,
    page: u64,
    limit: u64,
) -> Result<Vec<promoters::Model>, DbErr> {
    promoters::Entity::find()
        .order_by_asc(promoters::Column::NameEn)
        .paginate(db, limit)
        .fetch_page(page.saturating_sub(1))
        .await
}

/// Promoters that have at least one document expiry date recorded.
pub async fn get_promoters_with_expiry(
    db: &DatabaseConnection,
) -> Result<Vec<promoters::Model>, DbErr> {
    promoters::Entity::find()
        .filter(
            Condition::any()
                .add(promoters::Column::IdCardExpiryDate.is_not_null())
                .add(promoters::Column::PassportExpiryDate.is_not_null()),
        )
        .all(db)
        .await
}

/// Fetch a single promoter by ID.
pub async fn get_promoter_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<promoters::Model>, DbErr> {
    promoters::Entity::find_by_id(id).one(db).await
}

/// Update an existing promoter; only provided fields change.
pub async fn update_promoter(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdatePromoter,
) -> Result<promoters::Model, DbErr> {
    let promoter = promoters::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Promoter not found".to_string()))?;

    let mut active: promoters::ActiveModel = promoter.into();

    if let Some(name_en) = input.name_en {
        active.name_en = Set(name_en.trim().to_string());
    }
    if let Some(name_ar) = input.name_ar {
        active.name_ar = Set(name_ar.trim().to_string());
    }
    if let Some(id_card_number) = input.id_card_number {
        active.id_card_number = Set(id_card_number.trim().to_string());
    }
    if input.passport_number.is_some() {
        active.passport_number = Set(trimmed(input.passport_number));
    }
    if input.id_card_url.is_some() {
        active.id_card_url = Set(trimmed(input.id_card_url));
    }
    if input.passport_url.is_some() {
        active.passport_url = Set(trimmed(input.passport_url));
    }
    if let Some(date) = input.id_card_expiry_date {
        active.id_card_expiry_date = Set(Some(date));
    }
    if let Some(date) = input.passport_expiry_date {
        active.passport_expiry_date = Set(Some(date));
    }
    if let Some(days) = input.notify_days_before_id_expiry {
        active.notify_days_before_id_expiry = Set(days);
    }
    if let Some(days) = input.notify_days_before_passport_expiry {
        active.notify_days_before_passport_expiry = Set(days);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}
