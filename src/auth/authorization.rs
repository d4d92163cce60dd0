use actix_web::HttpResponse;

use crate::auth::middleware::AuthenticatedUser;
use crate::models::users::Roles;

/// Admin-only guard for dashboard endpoints such as the audit log.
pub fn require_admin(user: &AuthenticatedUser) -> Result<(), HttpResponse> {
    if user.0.role == Roles::Admin {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Only administrators can access this resource",
        })))
    }
}

/// Shared-secret check for the automation webhook.
///
/// With no secret configured every caller is accepted.
pub fn verify_webhook_secret(
    expected: Option<&str>,
    provided: Option<&str>,
) -> Result<(), HttpResponse> {
    match expected {
        None => Ok(()),
        Some(secret) if provided == Some(secret) => Ok(()),
        Some(_) => Err(HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid or missing webhook secret",
        }))),
    }
}
