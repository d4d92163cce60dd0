use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::automation::AutomationClient;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::audit_logs as audit_db;
use crate::db::contracts as contract_db;
use crate::generation::GenerationError;
use crate::generation::submission::submit_contract;
use crate::models::PaginationQuery;
use crate::models::contracts::{ContractQuery, CreateContract};
use crate::realtime::RealtimeHub;

/// POST /api/contracts: submit a contract for generation.
///
/// Returns 201 with the stored row even when the automation service could not be
/// reached; in that case the row comes back as `failed` with an `error_message`.
/// Validation problems return 400 with a per-field `fields` map.
pub async fn create_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    automation: web::Data<AutomationClient>,
    hub: web::Data<Arc<RealtimeHub>>,
    body: web::Json<CreateContract>,
) -> Result<HttpResponse, GenerationError> {
    let contract = submit_contract(
        db.get_ref(),
        automation.get_ref(),
        hub.get_ref(),
        Some(user.0.id),
        body.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Created().json(contract))
}

/// GET /api/contracts?status=&page=&limit=: newest first.
pub async fn get_contracts(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    filter: web::Query<ContractQuery>,
    pagination: web::Query<PaginationQuery>,
) -> impl Responder {
    match contract_db::get_contracts(
        db.get_ref(),
        filter.status,
        pagination.page(),
        pagination.limit(),
    )
    .await
    {
        Ok(contracts) => HttpResponse::Ok().json(contracts),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/contracts/{id}
pub async fn get_contract(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let contract_id = path.into_inner();

    match contract_db::get_contract_by_id(db.get_ref(), contract_id).await {
        Ok(Some(contract)) => HttpResponse::Ok().json(contract),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Contract {contract_id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/contracts/number/{contract_number}
pub async fn get_contract_by_number(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> impl Responder {
    let number = path.into_inner();

    match contract_db::get_contract_by_number(db.get_ref(), &number).await {
        Ok(Some(contract)) => HttpResponse::Ok().json(contract),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Contract {number} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/contracts/{id}/history: audit trail of one contract, oldest first.
pub async fn get_contract_history(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let contract_id = path.into_inner();

    match audit_db::get_audit_logs_for_entity(db.get_ref(), contract_id).await {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}
