use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Generation status stored as a lowercase string in the database.
///
/// `generated` is accepted as an inbound alias of `completed`; some automation
/// scenarios still send the old name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "queued")]
    Queued,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "completed")]
    #[serde(alias = "generated")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Queued => "queued",
            Status::Processing => "processing",
            Status::Completed => "completed",
            Status::Failed => "failed",
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "queued" => Ok(Status::Queued),
            "processing" => Ok(Status::Processing),
            "completed" | "generated" => Ok(Status::Completed),
            "failed" => Ok(Status::Failed),
            other => Err(format!("unknown contract status '{other}'")),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SeaORM entity for the `contracts` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub contract_number: String,
    pub first_party_id: Uuid,
    pub second_party_id: Uuid,
    pub promoter_id: Option<Uuid>,
    pub start_date: Date,
    pub end_date: Date,
    pub email: String,
    pub job_title: Option<String>,
    pub work_location: Option<String>,
    pub status: Status,
    pub pdf_url: Option<String>,
    pub error_message: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parties::Entity",
        from = "Column::FirstPartyId",
        to = "super::parties::Column::Id"
    )]
    FirstParty,
    #[sea_orm(
        belongs_to = "super::parties::Entity",
        from = "Column::SecondPartyId",
        to = "super::parties::Column::Id"
    )]
    SecondParty,
    #[sea_orm(
        belongs_to = "super::promoters::Entity",
        from = "Column::PromoterId",
        to = "super::promoters::Column::Id"
    )]
    Promoter,
}

impl Related<super::promoters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Promoter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Contract submission as received from the form.
///
/// `employer_id` / `client_id` are the column names used before the parties
/// migration; they are still accepted so older callers keep working.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContract {
    #[serde(alias = "employer_id")]
    pub first_party_id: Uuid,
    #[serde(alias = "client_id")]
    pub second_party_id: Uuid,
    pub promoter_id: Option<Uuid>,
    pub start_date: Date,
    pub end_date: Date,
    pub email: String,
    pub job_title: Option<String>,
    pub work_location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractQuery {
    pub status: Option<Status>,
}
