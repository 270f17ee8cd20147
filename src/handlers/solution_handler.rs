use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{SolutionQuery, SubmitSolutionRequest},
        response::ApiResponse,
    },
};

#[post("/solutions")]
pub async fn submit_solution(
    state: web::Data<AppState>,
    request: web::Json<SubmitSolutionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let record = state
        .solution_service
        .submit_solution(&auth.0.sub, request.into_inner(), Utc::now())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(record)))
}

#[get("/solutions")]
pub async fn list_solutions(
    state: web::Data<AppState>,
    query: web::Query<SolutionQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let records = state
        .solution_service
        .list_solutions(&auth.0.sub, query.problem_id.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(records)))
}
