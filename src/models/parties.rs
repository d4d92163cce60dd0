use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `parties` table.
///
/// A party is either side of a contract (employer company, client company or an
/// individual). Names are kept in both English and Arabic.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name_en: String,
    pub name_ar: String,
    pub crn: String,
    pub address_en: Option<String>,
    pub address_ar: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateParty {
    pub name_en: String,
    pub name_ar: String,
    pub crn: String,
    pub address_en: Option<String>,
    pub address_ar: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateParty {
    pub name_en: Option<String>,
    pub name_ar: Option<String>,
    pub crn: Option<String>,
    pub address_en: Option<String>,
    pub address_ar: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartyQuery {
    /// Case-insensitive match on either name or the CRN.
    pub search: Option<String>,
}
