use sea_orm::*;
use uuid::Uuid;

use crate::models::audit_logs::{self, CreateAuditLog};

/// Append an audit record.
pub async fn insert_audit_log(
    db: &DatabaseConnection,
    input: CreateAuditLog,
) -> Result<audit_logs::Model, DbErr> {
    let entry = audit_logs::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(input.user_id),
        action: Set(input.action.to_string()),
        entity_type: Set(input.entity_type.to_string()),
        entity_id: Set(input.entity_id),
        details: Set(input.details),
        created_at: Set(chrono::Utc::now()),
    };

    entry.insert(db).await
}

/// Audit log page, newest first.
pub async fn get_audit_logs(
    db: &DatabaseConnection,
    page: u64,
    limit: u64,
) -> Result<Vec<audit_logs::Model>, DbErr> {
    audit_logs::Entity::find()
        .order_by_desc(audit_logs::Column::CreatedAt)
        .paginate(db, limit)
        .fetch_page(page.saturating_sub(1))
        .await
}

/// Full history of one entity, oldest first.
pub async fn get_audit_logs_for_entity(
    db: &DatabaseConnection,
    entity_id: Uuid,
) -> Result<Vec<audit_logs::Model>, DbErr> {
    audit_logs::Entity::find()
        .filter(audit_logs::Column::EntityId.eq(entity_id))
        .order_by_asc(audit_logs::Column::CreatedAt)
        .all(db)
        .await
}
