use actix_web::{HttpResponse, Responder, web};
use sea_orm::{DatabaseConnection, DbErr};
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheData, keys};
use crate::db::parties as party_db;
use crate::generation::validation;
use crate::models::PaginationQuery;
use crate::models::parties::{CreateParty, PartyQuery, UpdateParty};

/// GET /api/parties?search=&page=&limit=: cached per query.
pub async fn get_parties(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    filter: web::Query<PartyQuery>,
    pagination: web::Query<PaginationQuery>,
) -> impl Responder {
    let search = filter.search.as_deref().unwrap_or_default().trim().to_lowercase();
    let (page, limit) = (pagination.page(), pagination.limit());
    let key = keys::party_list(&search, page, limit);

    let result = cache
        .get_or_load(&key, cache.config().list_ttl, || {
            party_db::get_parties(db.get_ref(), Some(search.as_str()), page, limit)
        })
        .await;

    match result {
        Ok(parties) => HttpResponse::Ok().json(parties),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch parties: {e}"),
        })),
    }
}

/// GET /api/parties/{id}
pub async fn get_party(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    match party_db::get_party_by_id(db.get_ref(), id).await {
        Ok(Some(party)) => HttpResponse::Ok().json(party),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Party {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// POST /api/parties
pub async fn create_party(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CreateParty>,
) -> impl Responder {
    let input = body.into_inner();

    if let Err(fields) = validation::validate_new_party(&input) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Validation failed",
            "fields": fields,
        }));
    }

    match party_db::insert_party(db.get_ref(), input).await {
        Ok(party) => {
            cache.invalidate(keys::PARTIES_PREFIX).await;
            tracing::info!(party_id = %party.id, "Party created");
            HttpResponse::Created().json(party)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create party: {e}"),
        })),
    }
}

/// PUT /api/parties/{id}
pub async fn update_party(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateParty>,
) -> impl Responder {
    let id = path.into_inner();
    let input = body.into_inner();

    if let Err(fields) = validation::validate_party_update(&input) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Validation failed",
            "fields": fields,
        }));
    }

    match party_db::update_party(db.get_ref(), id, input).await {
        Ok(party) => {
            cache.invalidate(keys::PARTIES_PREFIX).await;
            HttpResponse::Ok().json(party)
        }
        Err(DbErr::RecordNotFound(_)) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Party {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to update party: {e}"),
        })),
    }
}
