use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::authorization::verify_webhook_secret;
use crate::automation::ChannelNotifier;
use crate::generation::callback::{
    CallbackRequest, CallbackResponse, ContractRef, apply_callback, prepare_payload,
};
use crate::realtime::RealtimeHub;

pub const SECRET_HEADER: &str = "X-Webhook-Secret";

/// Shared secret the automation service must present, if configured.
#[derive(Clone, Default)]
pub struct WebhookSecret(pub Option<String>);

fn check_secret(req: &HttpRequest, secret: &WebhookSecret) -> Result<(), HttpResponse> {
    let provided = req
        .headers()
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok());
    verify_webhook_secret(secret.0.as_deref(), provided)
}

/// POST /api/webhook/automation: the automation service fetches the flattened
/// contract data it needs to render the PDF.
pub async fn fetch_payload(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<Arc<RealtimeHub>>,
    secret: web::Data<WebhookSecret>,
    body: web::Json<ContractRef>,
) -> HttpResponse {
    if let Err(resp) = check_secret(&req, &secret) {
        return resp;
    }

    match prepare_payload(db.get_ref(), hub.get_ref(), &body).await {
        Ok(payload) => HttpResponse::Ok().json(payload),
        Err(e) => {
            tracing::warn!("Automation payload request failed: {e}");
            actix_web::ResponseError::error_response(&e)
        }
    }
}

/// PATCH /api/webhook/automation: the automation service reports the outcome.
pub async fn receive_callback(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<Arc<RealtimeHub>>,
    notifier: web::Data<ChannelNotifier>,
    secret: web::Data<WebhookSecret>,
    body: web::Json<CallbackRequest>,
) -> HttpResponse {
    if let Err(resp) = check_secret(&req, &secret) {
        return resp;
    }

    match apply_callback(db.get_ref(), hub.get_ref(), notifier.get_ref(), &body).await {
        Ok(change) => HttpResponse::Ok().json(CallbackResponse::from(&change.contract)),
        Err(e) => {
            tracing::warn!("Automation callback rejected: {e}");
            actix_web::ResponseError::error_response(&e)
        }
    }
}
