use sea_orm::*;

use crate::models::users::{self, CreateUserFromAuth};

/// Find the local user for a Supabase identity, creating it on first sight.
pub async fn find_or_create_from_auth(
    db: &DatabaseConnection,
    input: CreateUserFromAuth,
) -> Result<users::Model, DbErr> {
    if let Some(existing) = users::Entity::find_by_id(input.id).one(db).await? {
        return Ok(existing);
    }

    let new_user = users::ActiveModel {
        id: Set(input.id),
        email: Set(input.email),
        display_name: Set(input.display_name),
        avatar_url: Set(input.avatar_url),
        role: Set(input.role),
        created_at: Set(chrono::Utc::now()),
    };

    new_user.insert(db).await
}
