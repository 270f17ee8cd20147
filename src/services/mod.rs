pub mod campus_clock;
pub mod mastery;
pub mod review_service;
pub mod review_targets;
pub mod scheduled_jobs;
pub mod scheduler_service;
pub mod solution_service;
pub mod workbook_service;
