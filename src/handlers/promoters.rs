use actix_web::{HttpResponse, Responder, web};
use sea_orm::{DatabaseConnection, DbErr};
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheData, keys};
use crate::db::promoters as promoter_db;
use crate::generation::validation;
use crate::models::PaginationQuery;
use crate::models::promoters::{CreatePromoter, ExpiringQuery, UpdatePromoter, expiring_documents};

/// GET /api/promoters?page=&limit=: cached per page.
pub async fn get_promoters(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    pagination: web::Query<PaginationQuery>,
) -> impl Responder {
    let (page, limit) = (pagination.page(), pagination.limit());
    let key = keys::promoter_list(page, limit);

    let result = cache
        .get_or_load(&key, cache.config().list_ttl, || {
            promoter_db::get_promoters(db.get_ref(), page, limit)
        })
        .await;

    match result {
        Ok(promoters) => HttpResponse::Ok().json(promoters),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch promoters: {e}"),
        })),
    }
}

/// GET /api/promoters/expiring?days=: identity documents inside their notice window.
pub async fn get_expiring_documents(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<ExpiringQuery>,
) -> impl Responder {
    match promoter_db::get_promoters_with_expiry(db.get_ref()).await {
        Ok(promoters) => {
            let today = chrono::Utc::now().date_naive();
            HttpResponse::Ok().json(expiring_documents(&promoters, today, query.days))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/promoters/{id}
pub async fn get_promoter(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    match promoter_db::get_promoter_by_id(db.get_ref(), id).await {
        Ok(Some(promoter)) => HttpResponse::Ok().json(promoter),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Promoter {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// POST /api/promoters
pub async fn create_promoter(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CreatePromoter>,
) -> impl Responder {
    let input = body.into_inner();

    if let Err(fields) = validation::validate_new_promoter(&input) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Validation failed",
            "fields": fields,
        }));
    }

    match promoter_db::insert_promoter(db.get_ref(), input).await {
        Ok(promoter) => {
            cache.invalidate(keys::PROMOTERS_PREFIX).await;
            tracing::info!(promoter_id = %promoter.id, "Promoter created");
            HttpResponse::Created().json(promoter)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create promoter: {e}"),
        })),
    }
}

/// PUT /api/promoters/{id}
pub async fn update_promoter(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePromoter>,
) -> impl Responder {
    let id = path.into_inner();
    let input = body.into_inner();

    if let Err(fields) = validation::validate_promoter_update(&input) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Validation failed",
            "fields": fields,
        }));
    }

    match promoter_db::update_promoter(db.get_ref(), id, input).await {
        Ok(promoter) => {
            cache.invalidate(keys::PROMOTERS_PREFIX).await;
            HttpResponse::Ok().json(promoter)
        }
        Err(DbErr::RecordNotFound(_)) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Promoter {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to update promoter: {e}"),
        })),
    }
}
