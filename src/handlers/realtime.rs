use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::auth::jwks::JwksCache;
use crate::auth::jwt;
use crate::realtime::RealtimeHub;
use crate::realtime::session::run_session;

/// Query params for the WebSocket handshake endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    pub token: String,
}

/// GET /api/realtime/contracts?token=<jwt>
///
/// Upgrades to a WebSocket that streams contract change events. The token is
/// passed as a query param because browsers cannot set headers on the handshake.
pub async fn ws_contracts(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<WsQuery>,
    jwks_cache: web::Data<Arc<JwksCache>>,
    hub: web::Data<Arc<RealtimeHub>>,
) -> Result<HttpResponse, actix_web::Error> {
    let claims = jwt::validate_token(&query.token, jwks_cache.get_ref())
        .await
        .map_err(|e| actix_web::error::ErrorUnauthorized(e.to_string()))?;
    let user_id = claims
        .user_id()
        .map_err(|e| actix_web::error::ErrorUnauthorized(e.to_string()))?;

    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    let (subscription_id, rx) = hub.subscribe().await;
    tracing::info!(%user_id, %subscription_id, "Realtime contract subscription opened");

    actix_web::rt::spawn(run_session(
        session,
        msg_stream,
        rx,
        subscription_id,
        hub.get_ref().clone(),
    ));

    Ok(response)
}
