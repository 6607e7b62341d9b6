use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, HttpResponse};

use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Health checks
        .route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(metrics_endpoint))
        // Document assembly
        .service(
            web::scope("/documents")
                .wrap(Logger::default())
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allowed_methods(vec!["GET", "POST"])
                        .allowed_headers(vec!["Content-Type"])
                        .max_age(3600),
                )
                .route("/create", web::post().to(handlers::create_document))
                .route(
                    "/create-flat-test-reporter",
                    web::post().to(handlers::create_flat_test_reporter_document),
                )
                .route(
                    "/validate-external-files",
                    web::post().to(handlers::validate_external_files),
                ),
        );
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": format!("online - {}", chrono::Utc::now().to_rfc3339())
    }))
}

async fn metrics_endpoint() -> HttpResponse {
    use prometheus::{Encoder, TextEncoder};

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];

    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}
