use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::app_state::AppState;

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[get("/health/live")]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "alive" }))
}

/// Ready once MongoDB answers a ping.
#[get("/health/ready")]
pub async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    let database = match &state.database {
        Some(db) => db.health_check().await.map_err(|e| e.to_string()),
        None => Ok(()),
    };

    match database {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ready",
            "scheduler": state.scheduler.is_active().await,
        })),
        Err(err) => {
            log::warn!("Readiness check failed: {}", err);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "not_ready",
                "error": err,
            }))
        }
    }
}
