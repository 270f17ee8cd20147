pub mod health_handler;
pub mod review_handler;
pub mod scheduler_handler;
pub mod solution_handler;
pub mod workbook_handler;

use actix_web::web;

pub use health_handler::{health_check, liveness, readiness};

/// Routes mounted under the authenticated `/api` scope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(review_handler::get_today_targets)
        .service(review_handler::get_priority_targets)
        .service(review_handler::get_schedules)
        .service(review_handler::get_today_workbook_reviews)
        .service(review_handler::get_today_stats)
        .service(review_handler::complete_workbook_review)
        .service(review_handler::complete_review)
        .service(solution_handler::submit_solution)
        .service(solution_handler::list_solutions)
        .service(workbook_handler::get_workbook_problems)
        .service(workbook_handler::get_workbook_progress)
        .service(workbook_handler::reorder_workbook_problems)
        .service(scheduler_handler::get_scheduler_status)
        .service(scheduler_handler::run_job)
        .service(scheduler_handler::start_scheduler)
        .service(scheduler_handler::stop_scheduler);
}

pub fn configure_health(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check).service(liveness).service(readiness);
}
