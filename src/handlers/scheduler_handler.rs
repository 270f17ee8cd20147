use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
    models::dto::response::ApiResponse,
};

#[get("/scheduler/status")]
pub async fn get_scheduler_status(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let status = state.scheduler.status().await;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(status)))
}

#[post("/scheduler/jobs/{name}/run")]
pub async fn run_job(
    state: web::Data<AppState>,
    name: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    log::info!("Manual run of {} requested by {}", name, auth.0.username);
    let outcome = state.scheduler.run_now(&name).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(outcome)))
}

#[post("/scheduler/start")]
pub async fn start_scheduler(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let started = state.scheduler.start().await;
    let message = if started {
        "Scheduler started"
    } else {
        "Scheduler was already running"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(state.scheduler.status().await, message)))
}

#[post("/scheduler/stop")]
pub async fn stop_scheduler(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let stopped = state.scheduler.stop().await;
    let message = if stopped {
        "Scheduler stopped"
    } else {
        "Scheduler was not running"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(state.scheduler.status().await, message)))
}
