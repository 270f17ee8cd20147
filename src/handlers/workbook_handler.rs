use actix_web::{get, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_staff, AuthenticatedUser},
    errors::AppError,
    models::dto::{request::ReorderProblemsRequest, response::ApiResponse},
};

#[get("/workbooks/{id}/problems")]
pub async fn get_workbook_problems(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let problems = state.workbook_service.problems(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(problems)))
}

#[get("/workbooks/{id}/progress")]
pub async fn get_workbook_progress(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let progress = state.workbook_service.progress(&auth.0.sub, &id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(progress)))
}

#[put("/workbooks/{id}/problems/order")]
pub async fn reorder_workbook_problems(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<ReorderProblemsRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth.0)?;

    let problems = state
        .workbook_service
        .reorder(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(problems, "Problem order updated")))
}
