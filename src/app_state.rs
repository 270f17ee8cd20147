use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        DailyStatsRepository, MongoDailyStatsRepository, MongoProblemRepository,
        MongoReviewReminderRepository, MongoReviewScheduleRepository,
        MongoSolutionRecordRepository, MongoUserRepository, MongoWorkbookRepository,
        MongoWorkbookReviewScheduleRepository, ProblemRepository, ReviewReminderRepository,
        ReviewScheduleRepository, SolutionRecordRepository, UserRepository, WorkbookRepository,
        WorkbookReviewScheduleRepository,
    },
    services::{
        review_service::ReviewService, scheduled_jobs::JobContext,
        scheduler_service::SchedulerService, solution_service::SolutionService,
        workbook_service::WorkbookService,
    },
};

/// Storage backends the services are wired against.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub problems: Arc<dyn ProblemRepository>,
    pub workbooks: Arc<dyn WorkbookRepository>,
    pub solutions: Arc<dyn SolutionRecordRepository>,
    pub schedules: Arc<dyn ReviewScheduleRepository>,
    pub workbook_schedules: Arc<dyn WorkbookReviewScheduleRepository>,
    pub stats: Arc<dyn DailyStatsRepository>,
    pub reminders: Arc<dyn ReviewReminderRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub review_service: Arc<ReviewService>,
    pub solution_service: Arc<SolutionService>,
    pub workbook_service: Arc<WorkbookService>,
    pub scheduler: Arc<SchedulerService>,
    pub config: Arc<Config>,
    pub database: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let users = Arc::new(MongoUserRepository::new(&db));
        users.ensure_indexes().await?;
        let problems = Arc::new(MongoProblemRepository::new(&db));
        problems.ensure_indexes().await?;
        let workbooks = Arc::new(MongoWorkbookRepository::new(&db));
        workbooks.ensure_indexes().await?;
        let solutions = Arc::new(MongoSolutionRecordRepository::new(&db));
        solutions.ensure_indexes().await?;
        let schedules = Arc::new(MongoReviewScheduleRepository::new(&db));
        schedules.ensure_indexes().await?;
        let workbook_schedules = Arc::new(MongoWorkbookReviewScheduleRepository::new(&db));
        workbook_schedules.ensure_indexes().await?;
        let stats = Arc::new(MongoDailyStatsRepository::new(&db));
        stats.ensure_indexes().await?;
        let reminders = Arc::new(MongoReviewReminderRepository::new(&db));
        reminders.ensure_indexes().await?;

        let repositories = Repositories {
            users,
            problems,
            workbooks,
            solutions,
            schedules,
            workbook_schedules,
            stats,
            reminders,
        };

        let mut state = Self::from_repositories(repositories, config);
        state.database = Some(db);
        Ok(state)
    }

    /// Wires the services without touching MongoDB.
    pub fn from_repositories(repos: Repositories, config: Config) -> Self {
        let review_service = Arc::new(ReviewService::new(
            repos.solutions.clone(),
            repos.schedules.clone(),
            repos.workbook_schedules.clone(),
            repos.stats.clone(),
            config.review_policy,
            config.campus_clock,
        ));

        let solution_service = Arc::new(SolutionService::new(
            repos.problems.clone(),
            repos.workbooks.clone(),
            repos.solutions.clone(),
            repos.schedules.clone(),
            config.review_policy,
        ));

        let workbook_service = Arc::new(WorkbookService::new(
            repos.workbooks.clone(),
            repos.solutions.clone(),
        ));

        let job_context = JobContext {
            users: repos.users,
            solutions: repos.solutions,
            schedules: repos.schedules,
            workbook_schedules: repos.workbook_schedules,
            stats: repos.stats,
            reminders: repos.reminders,
            clock: config.campus_clock,
            retention_days: config.schedule_retention_days,
        };
        let scheduler = Arc::new(SchedulerService::new(
            job_context,
            config.scheduler_retry_delay,
        ));

        Self {
            review_service,
            solution_service,
            workbook_service,
            scheduler,
            config: Arc::new(config),
            database: None,
        }
    }
}
