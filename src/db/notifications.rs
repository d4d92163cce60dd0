use sea_orm::*;
use uuid::Uuid;

use crate::models::notifications::{self, CreateNotification};

/// Append a notification.
pub async fn insert_notification(
    db: &DatabaseConnection,
    input: CreateNotification,
) -> Result<notifications::Model, DbErr> {
    let new_notification = notifications::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(input.user_id),
        contract_id: Set(input.contract_id),
        kind: Set(input.kind),
        message: Set(input.message),
        is_read: Set(false),
        created_at: Set(chrono::Utc::now()),
    };

    new_notification.insert(db).await
}

/// Notifications visible to `user_id` (their own plus broadcast ones), newest first.
pub async fn get_notifications_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
    page: u64,
    limit: u64,
) -> Result<Vec<notifications::Model>, DbErr> {
    notifications::Entity::find()
        .filter(
            Condition::any()
                .add(notifications::Column::UserId.eq(user_id))
                .add(notifications::Column::UserId.is_null()),
        )
        .order_by_desc(notifications::Column::CreatedAt)
        .paginate(db, limit)
        .fetch_page(page.saturating_sub(1))
        .await
}

/// All notifications attached to a contract, oldest first.
pub async fn get_notifications_for_contract(
    db: &DatabaseConnection,
    contract_id: Uuid,
) -> Result<Vec<notifications::Model>, DbErr> {
    notifications::Entity::find()
        .filter(notifications::Column::ContractId.eq(contract_id))
        .order_by_asc(notifications::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn get_notification_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<notifications::Model>, DbErr> {
    notifications::Entity::find_by_id(id).one(db).await
}

/// Mark a notification as read.
pub async fn mark_as_read(
    db: &DatabaseConnection,
    notification: notifications::Model,
) -> Result<notifications::Model, DbErr> {
    let mut active: notifications::ActiveModel = notification.into();
    active.is_read = Set(true);
    active.update(db).await
}
