pub mod auth;
pub mod contracts;
pub mod dashboard;
pub mod parties;
pub mod promoters;
pub mod realtime;
pub mod webhook;

use actix_web::web;

/// Routes called by the automation service. Guarded by the webhook secret, not JWT.
pub fn webhook_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/webhook/automation")
            .route(web::post().to(webhook::fetch_payload))
            .route(web::patch().to(webhook::receive_callback)),
    );
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    // ── Automation webhook ──
    webhook_routes(cfg);

    // ── Realtime (JWT in query string) ──
    cfg.service(
        web::resource("/realtime/contracts").route(web::get().to(realtime::ws_contracts)),
    );

    // ── Contract routes ──
    cfg.service(
        web::scope("/contracts")
            .route("", web::get().to(contracts::get_contracts))
            .route("", web::post().to(contracts::create_contract))
            .route(
                "/number/{contract_number}",
                web::get().to(contracts::get_contract_by_number),
            )
            .route("/{id}", web::get().to(contracts::get_contract))
            .route("/{id}/history", web::get().to(contracts::get_contract_history)),
    );

    // ── Party routes ──
    cfg.service(
        web::scope("/parties")
            .route("", web::get().to(parties::get_parties))
            .route("", web::post().to(parties::create_party))
            .route("/{id}", web::get().to(parties::get_party))
            .route("/{id}", web::put().to(parties::update_party)),
    );

    // ── Promoter routes ──
    cfg.service(
        web::scope("/promoters")
            .route("", web::get().to(promoters::get_promoters))
            .route("", web::post().to(promoters::create_promoter))
            .route("/expiring", web::get().to(promoters::get_expiring_documents))
            .route("/{id}", web::get().to(promoters::get_promoter))
            .route("/{id}", web::put().to(promoters::update_promoter)),
    );

    // ── Dashboard routes ──
    cfg.service(web::resource("/dashboard/stats").route(web::get().to(dashboard::get_stats)));
    cfg.service(
        web::resource("/notifications").route(web::get().to(dashboard::get_notifications)),
    );
    cfg.service(
        web::resource("/notifications/{id}/read")
            .route(web::put().to(dashboard::mark_notification_read)),
    );
    cfg.service(web::resource("/audit-logs").route(web::get().to(dashboard::get_audit_logs)));
}
