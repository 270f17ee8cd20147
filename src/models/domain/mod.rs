pub mod daily_review_stats;
pub mod problem;
pub mod review_schedule;
pub mod solution_record;
pub mod user;
pub mod workbook;

pub use daily_review_stats::{DailyReviewStats, ReviewReminder};
pub use problem::Problem;
pub use review_schedule::{ReviewSchedule, WorkbookReviewSchedule};
pub use solution_record::SolutionRecord;
pub use user::{User, UserRole};
pub use workbook::{Workbook, WorkbookProblem};
