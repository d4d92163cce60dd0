use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of dashboard notification, stored as a lowercase string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    #[sea_orm(string_value = "info")]
    Info,
    #[sea_orm(string_value = "success")]
    Success,
    #[sea_orm(string_value = "error")]
    Error,
}

/// SeaORM entity for the `notifications` table.
///
/// Rows are append-only apart from the `is_read` flag. A `None` user id means the
/// notification is visible to every signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub contract_id: Option<Uuid>,
    pub kind: Kind,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: Option<Uuid>,
    pub contract_id: Option<Uuid>,
    pub kind: Kind,
    pub message: String,
}
