use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{CompleteReviewRequest, PriorityTargetsQuery, ScheduleQuery},
        response::ApiResponse,
    },
};

#[get("/reviews/today")]
pub async fn get_today_targets(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let targets = state
        .review_service
        .today_targets(&auth.0.sub, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(targets)))
}

#[get("/reviews/priority")]
pub async fn get_priority_targets(
    state: web::Data<AppState>,
    query: web::Query<PriorityTargetsQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    query.validate()?;

    let targets = state
        .review_service
        .priority_targets(&auth.0.sub, query.max_overdue_days, query.limit, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(targets)))
}

#[post("/reviews/{record_id}/complete")]
pub async fn complete_review(
    state: web::Data<AppState>,
    record_id: web::Path<String>,
    request: web::Json<CompleteReviewRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let record = state
        .review_service
        .complete_review(&auth.0.sub, &record_id, request.is_correct, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(record, "Review completed")))
}

#[get("/reviews/schedules")]
pub async fn get_schedules(
    state: web::Data<AppState>,
    query: web::Query<ScheduleQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let schedules = state
        .review_service
        .list_schedules(&auth.0.sub, query.include_completed)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(schedules)))
}

#[get("/reviews/workbooks/today")]
pub async fn get_today_workbook_reviews(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let schedules = state
        .review_service
        .today_workbook_reviews(&auth.0.sub, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(schedules)))
}

#[post("/reviews/workbooks/{schedule_id}/complete")]
pub async fn complete_workbook_review(
    state: web::Data<AppState>,
    schedule_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let completion = state
        .review_service
        .complete_workbook_review(&auth.0.sub, &schedule_id, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        completion,
        "Workbook review completed",
    )))
}

#[get("/reviews/stats/today")]
pub async fn get_today_stats(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let stats = state
        .review_service
        .today_stats(&auth.0.sub, Utc::now())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}
