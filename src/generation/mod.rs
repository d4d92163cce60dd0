//! Contract generation handshake: submission, automation callbacks and the
//! side effects of every status change.

pub mod callback;
pub mod lifecycle;
pub mod payload;
pub mod submission;
pub mod validation;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DatabaseConnection, DbErr};
use tracing::{error, warn};
use uuid::Uuid;

use crate::db::audit_logs as audit_db;
use crate::db::contracts as contract_db;
use crate::db::notifications as notification_db;
use crate::models::audit_logs::CreateAuditLog;
use crate::models::contracts::{Model, Status};
use crate::models::notifications::{CreateNotification, Kind};
use crate::realtime::{ContractEvent, RealtimeHub};
use lifecycle::{TargetState, Transition, TransitionError};
use validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("invalid webhook request: {0}")]
    BadRequest(String),
    #[error("contract {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl ResponseError for GenerationError {
    fn status_code(&self) -> StatusCode {
        match self {
            GenerationError::Validation(_) | GenerationError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            GenerationError::Transition(TransitionError::MissingPdfUrl) => StatusCode::BAD_REQUEST,
            GenerationError::Transition(_) => StatusCode::CONFLICT,
            GenerationError::NotFound(_) => StatusCode::NOT_FOUND,
            GenerationError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            GenerationError::Validation(fields) => serde_json::json!({
                "error": "Validation failed",
                "fields": fields,
            }),
            GenerationError::Database(e) => {
                error!("Database error during contract generation: {e}");
                serde_json::json!({ "error": "Failed to save contract" })
            }
            other => serde_json::json!({ "error": other.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Result of asking for a status change.
#[derive(Debug, Clone)]
pub struct StateChange {
    pub contract: Model,
    /// False when the row already held the requested state.
    pub applied: bool,
}

const STATE_WRITE_ATTEMPTS: usize = 3;

/// Check and write a status change, then record its side effects.
///
/// The write is conditional on the status we checked against. If another request
/// changed the row in between, it is re-read and checked again; replaying the
/// state it now holds is reported as not applied.
pub async fn change_state(
    db: &DatabaseConnection,
    hub: &RealtimeHub,
    contract: Model,
    target: TargetState,
    actor: Option<Uuid>,
) -> Result<StateChange, GenerationError> {
    let mut current = contract;

    for _ in 0..STATE_WRITE_ATTEMPTS {
        if lifecycle::check_transition(&current, &target)? == Transition::Unchanged {
            return Ok(StateChange {
                contract: current,
                applied: false,
            });
        }

        let from = current.status;
        if let Some(updated) = contract_db::transition_state(db, &current, target.clone()).await? {
            record_transition(db, hub, from, &updated, actor).await;
            return Ok(StateChange {
                contract: updated,
                applied: true,
            });
        }

        current = contract_db::get_contract_by_id(db, current.id)
            .await?
            .ok_or_else(|| GenerationError::NotFound(current.contract_number.clone()))?;
    }

    Err(DbErr::Custom(format!(
        "contract {} kept changing while applying {}",
        current.contract_number, target.status
    ))
    .into())
}

/// Audit row, dashboard notification and realtime event for an applied change.
///
/// These are display records; failing to write them is logged, not propagated.
async fn record_transition(
    db: &DatabaseConnection,
    hub: &RealtimeHub,
    from: Status,
    contract: &Model,
    actor: Option<Uuid>,
) {
    let audit = CreateAuditLog {
        user_id: actor,
        action: "contract.status_changed",
        entity_type: "contract",
        entity_id: contract.id,
        details: Some(serde_json::json!({
            "from": from,
            "to": contract.status,
            "pdf_url": contract.pdf_url,
            "error_message": contract.error_message,
        })),
    };
    if let Err(e) = audit_db::insert_audit_log(db, audit).await {
        warn!(contract_number = %contract.contract_number, "Failed to write audit log: {e}");
    }

    let notification = match contract.status {
        Status::Completed => Some((
            Kind::Success,
            format!("Contract {} is ready to download", contract.contract_number),
        )),
        Status::Failed => Some((
            Kind::Error,
            format!(
                "Contract {} could not be generated: {}",
                contract.contract_number,
                contract.error_message.as_deref().unwrap_or_default()
            ),
        )),
        _ => None,
    };
    if let Some((kind, message)) = notification {
        notify(db, contract, kind, message).await;
    }

    hub.publish(ContractEvent::Updated {
        contract: contract.clone(),
    })
    .await;
}

async fn notify(db: &DatabaseConnection, contract: &Model, kind: Kind, message: String) {
    let input = CreateNotification {
        user_id: contract.created_by,
        contract_id: Some(contract.id),
        kind,
        message,
    };
    if let Err(e) = notification_db::insert_notification(db, input).await {
        warn!(contract_number = %contract.contract_number, "Failed to write notification: {e}");
    }
}
