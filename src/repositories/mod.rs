pub mod daily_stats_repository;
pub mod problem_repository;
pub mod review_schedule_repository;
pub mod solution_record_repository;
pub mod user_repository;
pub mod workbook_repository;

pub use daily_stats_repository::{
    DailyStatsRepository, MongoDailyStatsRepository, MongoReviewReminderRepository,
    ReviewReminderRepository,
};
pub use problem_repository::{MongoProblemRepository, ProblemRepository};
pub use review_schedule_repository::{
    MongoReviewScheduleRepository, MongoWorkbookReviewScheduleRepository, ReviewScheduleRepository,
    WorkbookReviewScheduleRepository,
};
pub use solution_record_repository::{MongoSolutionRecordRepository, SolutionRecordRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
pub use workbook_repository::{MongoWorkbookRepository, WorkbookRepository};
