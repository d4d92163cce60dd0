use sea_orm::*;
use uuid::Uuid;

use crate::models::parties::{self, CreateParty, UpdateParty};

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Insert a new party.
pub async fn insert_party(
    db: &DatabaseConnection,
    input: CreateParty,
) -> Result<parties::Model, DbErr> {
    let new_party = parties::ActiveModel {
        id: Set(Uuid::new_v4()),
        name_en: Set(input.name_en.trim().to_string()),
        name_ar: Set(input.name_ar.trim().to_string()),
        crn: Set(input.crn.trim().to_string()),
        address_en: Set(trimmed(input.address_en)),
        address_ar: Set(trimmed(input.address_ar)),
        contact_person: Set(trimmed(input.contact_person)),
        contact_email: Set(trimmed(input.contact_email)),
        contact_phone: Set(trimmed(input.contact_phone)),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_party.insert(db).await
}

/// List parties alphabetically, optionally filtered by name or CRN.
pub async fn get_parties(
    db: &DatabaseConnection,
    search: Option<&str>,
    page: u64,
    limit: u64,
) -> Result<Vec<parties::Model>, DbErr> {
    let mut query = parties::Entity::find();

    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(parties::Column::NameEn.contains(term))
                .add(parties::Column::NameAr.contains(term))
                .add(parties::Column::Crn.contains(term)),
        );
    }

    query
        .order_by_asc(parties::Column::NameEn)
        .paginate(db, limit)
        .fetch_page(page.saturating_sub(1))
        .await
}

/// Fetch a single party by ID.
pub async fn get_party_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<parties::Model>, DbErr> {
    parties::Entity::find_by_id(id).one(db).await
}

/// Update an existing party; only provided fields change.
pub async fn update_party(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateParty,
) -> Result<parties::Model, DbErr> {
    let party = parties::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Party not found".to_string()))?;

    let mut active: parties::ActiveModel = party.into();

    if let Some(name_en) = input.name_en {
        active.name_en = Set(name_en.trim().to_string());
    }
    if let Some(name_ar) = input.name_ar {
        active.name_ar = Set(name_ar.trim().to_string());
    }
    if let Some(crn) = input.crn {
        active.crn = Set(crn.trim().to_string());
    }
    if input.address_en.is_some() {
        active.address_en = Set(trimmed(input.address_en));
    }
    if input.address_ar.is_some() {
        active.address_ar = Set(trimmed(input.address_ar));
    }
    if input.contact_person.is_some() {
        active.contact_person = Set(trimmed(input.contact_person));
    }
    if input.contact_email.is_some() {
        active.contact_email = Set(trimmed(input.contact_email));
    }
    if input.contact_phone.is_some() {
        active.contact_phone = Set(trimmed(input.contact_phone));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}
