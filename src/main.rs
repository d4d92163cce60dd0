use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use contracthub_backend::auth::jwks::JwksCache;
use contracthub_backend::automation::{AutomationClient, ChannelNotifier};
use contracthub_backend::cache::RedisCache;
use contracthub_backend::config::AppConfig;
use contracthub_backend::create_pool;
use contracthub_backend::handlers;
use contracthub_backend::handlers::webhook::WebhookSecret;
use contracthub_backend::realtime::RealtimeHub;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let db = create_pool(&config.database_url)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to database: {e}")))?;
    Migrator::up(&db, None)
        .await
        .map_err(|e| std::io::Error::other(format!("Migration failed: {e}")))?;
    let db_data = web::Data::new(db);

    let redis_cache = RedisCache::new(&config.redis_url, config.cache.clone())
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to Redis: {e}")))?;
    let redis_data = web::Data::new(Arc::new(redis_cache));
    tracing::info!("Connected to Redis");

    let jwks_cache = web::Data::new(Arc::new(JwksCache::new(
        &config.supabase_project_ref,
        &config.supabase_anon_key,
    )));

    let automation = web::Data::new(AutomationClient::new(
        config.automation_webhook_url.clone(),
        config.automation_timeout,
    ));
    if !automation.is_configured() {
        tracing::warn!("AUTOMATION_WEBHOOK_URL not set; contracts will stay pending");
    }
    let notifier = web::Data::new(ChannelNotifier::new(config.notification_webhook_url.clone()));
    let webhook_secret = web::Data::new(WebhookSecret(config.webhook_secret.clone()));

    // Shared hub for realtime contract subscriptions.
    let hub = web::Data::new(Arc::new(RealtimeHub::new()));

    let bind_addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
                actix_web::http::header::HeaderName::from_static("x-webhook-secret"),
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(redis_data.clone())
            .app_data(jwks_cache.clone())
            .app_data(automation.clone())
            .app_data(notifier.clone())
            .app_data(webhook_secret.clone())
            .app_data(hub.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
