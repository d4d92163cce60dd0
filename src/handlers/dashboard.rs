use actix_web::{HttpResponse, Responder, web};
use sea_orm::{DatabaseConnection, DbErr, Iterable};
use uuid::Uuid;

use crate::auth::authorization::require_admin;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheData, keys};
use crate::db::audit_logs as audit_db;
use crate::db::contracts as contract_db;
use crate::db::notifications as notification_db;
use crate::models::PaginationQuery;
use crate::models::contracts::Status;
use crate::store::ContractStatistics;

/// Count contracts per status straight from the database.
pub async fn load_statistics(db: &DatabaseConnection) -> Result<ContractStatistics, DbErr> {
    let mut stats = ContractStatistics::default();
    for status in Status::iter() {
        let count = contract_db::count_by_status(db, status).await?;
        stats.record(status, count);
    }
    Ok(stats)
}

/// GET /api/dashboard/stats: contract counts per status (briefly cached).
pub async fn get_stats(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
) -> impl Responder {
    let result = cache
        .get_or_load(&keys::dashboard_stats(), cache.config().stats_ttl, || {
            load_statistics(db.get_ref())
        })
        .await;

    match result {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/notifications?page=&limit=: the user's own plus broadcast notifications.
pub async fn get_notifications(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    pagination: web::Query<PaginationQuery>,
) -> impl Responder {
    match notification_db::get_notifications_for_user(
        db.get_ref(),
        user.0.id,
        pagination.page(),
        pagination.limit(),
    )
    .await
    {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// PUT /api/notifications/{id}/read
pub async fn mark_notification_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    mark_read_for_user(db.get_ref(), path.into_inner(), user.0.id).await
}

/// Mark notification `id` as read on behalf of `user_id`.
///
/// Broadcast notifications (no user) may be acknowledged by anyone; a
/// notification addressed to someone else is forbidden.
pub async fn mark_read_for_user(db: &DatabaseConnection, id: Uuid, user_id: Uuid) -> HttpResponse {
    let notification = match notification_db::get_notification_by_id(db, id).await {
        Ok(Some(n)) => n,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Notification {id} not found"),
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    };

    if notification.user_id.is_some_and(|owner| owner != user_id) {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "You can only update your own notifications",
        }));
    }

    match notification_db::mark_as_read(db, notification).await {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to update notification: {e}"),
        })),
    }
}

/// GET /api/audit-logs?page=&limit=: admin only.
pub async fn get_audit_logs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    pagination: web::Query<PaginationQuery>,
) -> impl Responder {
    if let Err(resp) = require_admin(&user) {
        return resp;
    }

    match audit_db::get_audit_logs(db.get_ref(), pagination.page(), pagination.limit()).await {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}
