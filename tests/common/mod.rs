#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use secrecy::SecretString;
use tokio::sync::RwLock;

use woodie_campus_server::{
    app_state::{AppState, Repositories},
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        DailyReviewStats, Problem, ReviewReminder, ReviewSchedule, SolutionRecord, User,
        Workbook, WorkbookProblem, WorkbookReviewSchedule,
    },
    repositories::{
        DailyStatsRepository, ProblemRepository, ReviewReminderRepository,
        ReviewScheduleRepository, SolutionRecordRepository, UserRepository, WorkbookRepository,
        WorkbookReviewScheduleRepository,
    },
    services::{campus_clock::CampusClock, mastery::ReviewPolicy},
};

pub const TEST_SECRET: &str = "integration-test-secret-with-enough-length";

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::AlreadyExists(format!("User '{}'", user.username)));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_active(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.is_active)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProblemRepository {
    problems: RwLock<HashMap<String, Problem>>,
}

#[async_trait]
impl ProblemRepository for InMemoryProblemRepository {
    async fn create(&self, problem: Problem) -> AppResult<Problem> {
        self.problems
            .write()
            .await
            .insert(problem.id.clone(), problem.clone());
        Ok(problem)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Problem>> {
        Ok(self.problems.read().await.get(id).cloned())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySolutionRecordRepository {
    records: RwLock<HashMap<String, SolutionRecord>>,
}

impl InMemorySolutionRecordRepository {
    async fn matching(&self, keep: impl Fn(&SolutionRecord) -> bool) -> Vec<SolutionRecord> {
        let mut records: Vec<SolutionRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| keep(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }
}

#[async_trait]
impl SolutionRecordRepository for InMemorySolutionRecordRepository {
    async fn create(&self, record: SolutionRecord) -> AppResult<SolutionRecord> {
        self.records
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<SolutionRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn update(&self, record: SolutionRecord) -> AppResult<SolutionRecord> {
        let mut records = self.records.write().await;
        if !records.contains_key(&record.id) {
            return Err(AppError::NotFound(format!("Solution record '{}'", record.id)));
        }
        records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<SolutionRecord>> {
        Ok(self.matching(|r| r.user_id == user_id).await)
    }

    async fn find_by_user_and_problem(
        &self,
        user_id: &str,
        problem_id: &str,
    ) -> AppResult<Vec<SolutionRecord>> {
        Ok(self
            .matching(|r| r.user_id == user_id && r.problem_id == problem_id)
            .await)
    }

    async fn find_by_user_for_problems(
        &self,
        user_id: &str,
        problem_ids: Vec<String>,
    ) -> AppResult<Vec<SolutionRecord>> {
        Ok(self
            .matching(|r| r.user_id == user_id && problem_ids.contains(&r.problem_id))
            .await)
    }
}

#[derive(Default)]
pub struct InMemoryReviewScheduleRepository {
    schedules: RwLock<HashMap<String, ReviewSchedule>>,
}

#[async_trait]
impl ReviewScheduleRepository for InMemoryReviewScheduleRepository {
    async fn create(&self, schedule: ReviewSchedule) -> AppResult<ReviewSchedule> {
        self.schedules
            .write()
            .await
            .insert(schedule.id.clone(), schedule.clone());
        Ok(schedule)
    }

    async fn update(&self, schedule: ReviewSchedule) -> AppResult<ReviewSchedule> {
        self.schedules
            .write()
            .await
            .insert(schedule.id.clone(), schedule.clone());
        Ok(schedule)
    }

    async fn find_pending_for_problem(
        &self,
        user_id: &str,
        problem_id: &str,
    ) -> AppResult<Vec<ReviewSchedule>> {
        Ok(self
            .schedules
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id && s.problem_id == problem_id && !s.is_completed)
            .cloned()
            .collect())
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        include_completed: bool,
    ) -> AppResult<Vec<ReviewSchedule>> {
        Ok(self
            .schedules
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id && (include_completed || !s.is_completed))
            .cloned()
            .collect())
    }

    async fn delete_completed_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut schedules = self.schedules.write().await;
        let before = schedules.len();
        schedules.retain(|_, s| !(s.is_completed && s.completed_at.is_some_and(|at| at < cutoff)));
        Ok((before - schedules.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryWorkbookReviewScheduleRepository {
    schedules: RwLock<HashMap<String, WorkbookReviewSchedule>>,
}

#[async_trait]
impl WorkbookReviewScheduleRepository for InMemoryWorkbookReviewScheduleRepository {
    async fn create(&self, schedule: WorkbookReviewSchedule) -> AppResult<WorkbookReviewSchedule> {
        self.schedules
            .write()
            .await
            .insert(schedule.id.clone(), schedule.clone());
        Ok(schedule)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<WorkbookReviewSchedule>> {
        Ok(self.schedules.read().await.get(id).cloned())
    }

    async fn update(&self, schedule: WorkbookReviewSchedule) -> AppResult<WorkbookReviewSchedule> {
        self.schedules
            .write()
            .await
            .insert(schedule.id.clone(), schedule.clone());
        Ok(schedule)
    }

    async fn find_pending_by_user(&self, user_id: &str) -> AppResult<Vec<WorkbookReviewSchedule>> {
        Ok(self
            .schedules
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id && !s.is_completed)
            .cloned()
            .collect())
    }

    async fn delete_completed_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut schedules = self.schedules.write().await;
        let before = schedules.len();
        schedules.retain(|_, s| !(s.is_completed && s.completed_at.is_some_and(|at| at < cutoff)));
        Ok((before - schedules.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryWorkbookRepository {
    workbooks: RwLock<HashMap<String, Workbook>>,
    entries: RwLock<Vec<WorkbookProblem>>,
}

#[async_trait]
impl WorkbookRepository for InMemoryWorkbookRepository {
    async fn create(&self, workbook: Workbook) -> AppResult<Workbook> {
        self.workbooks
            .write()
            .await
            .insert(workbook.id.clone(), workbook.clone());
        Ok(workbook)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Workbook>> {
        Ok(self.workbooks.read().await.get(id).cloned())
    }

    async fn add_problem(&self, entry: WorkbookProblem) -> AppResult<WorkbookProblem> {
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn find_problems(&self, workbook_id: &str) -> AppResult<Vec<WorkbookProblem>> {
        let mut entries: Vec<WorkbookProblem> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.workbook_id == workbook_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.order_index);
        Ok(entries)
    }

    async fn update_order(&self, updated: Vec<WorkbookProblem>) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        for entry in updated {
            if let Some(existing) = entries.iter_mut().find(|e| e.id == entry.id) {
                existing.order_index = entry.order_index;
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryDailyStatsRepository {
    stats: RwLock<HashMap<(String, NaiveDate), DailyReviewStats>>,
}

#[async_trait]
impl DailyStatsRepository for InMemoryDailyStatsRepository {
    async fn find(&self, user_id: &str, date: NaiveDate) -> AppResult<Option<DailyReviewStats>> {
        Ok(self
            .stats
            .read()
            .await
            .get(&(user_id.to_string(), date))
            .cloned())
    }

    async fn reset(&self, user_id: &str, date: NaiveDate) -> AppResult<()> {
        self.stats.write().await.insert(
            (user_id.to_string(), date),
            DailyReviewStats::empty(user_id, date),
        );
        Ok(())
    }

    async fn set_target_count(&self, user_id: &str, date: NaiveDate, count: i32) -> AppResult<()> {
        let mut stats = self.stats.write().await;
        let entry = stats
            .entry((user_id.to_string(), date))
            .or_insert_with(|| DailyReviewStats::empty(user_id, date));
        entry.target_count = count;
        entry.updated_at = Utc::now();
        Ok(())
    }

    async fn record_review(&self, user_id: &str, date: NaiveDate, is_correct: bool) -> AppResult<()> {
        let mut stats = self.stats.write().await;
        let entry = stats
            .entry((user_id.to_string(), date))
            .or_insert_with(|| DailyReviewStats::empty(user_id, date));
        entry.completed_count += 1;
        if is_correct {
            entry.correct_count += 1;
        }
        entry.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryReviewReminderRepository {
    reminders: RwLock<HashMap<(String, NaiveDate), ReviewReminder>>,
}

#[async_trait]
impl ReviewReminderRepository for InMemoryReviewReminderRepository {
    async fn upsert(&self, reminder: ReviewReminder) -> AppResult<()> {
        self.reminders.write().await.insert(
            (reminder.user_id.clone(), reminder.reminder_date),
            reminder,
        );
        Ok(())
    }

    async fn find_for_date(&self, date: NaiveDate) -> AppResult<Vec<ReviewReminder>> {
        let mut reminders: Vec<ReviewReminder> = self
            .reminders
            .read()
            .await
            .values()
            .filter(|r| r.reminder_date == date)
            .cloned()
            .collect();
        reminders.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(reminders)
    }
}

/// Concrete handles on every in-memory store, for seeding and inspection.
#[derive(Clone, Default)]
pub struct Backend {
    pub users: Arc<InMemoryUserRepository>,
    pub problems: Arc<InMemoryProblemRepository>,
    pub workbooks: Arc<InMemoryWorkbookRepository>,
    pub solutions: Arc<InMemorySolutionRecordRepository>,
    pub schedules: Arc<InMemoryReviewScheduleRepository>,
    pub workbook_schedules: Arc<InMemoryWorkbookReviewScheduleRepository>,
    pub stats: Arc<InMemoryDailyStatsRepository>,
    pub reminders: Arc<InMemoryReviewReminderRepository>,
}

impl Backend {
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: self.users.clone(),
            problems: self.problems.clone(),
            workbooks: self.workbooks.clone(),
            solutions: self.solutions.clone(),
            schedules: self.schedules.clone(),
            workbook_schedules: self.workbook_schedules.clone(),
            stats: self.stats.clone(),
            reminders: self.reminders.clone(),
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState::from_repositories(self.repositories(), test_config())
    }
}

/// Deterministic settings regardless of the surrounding environment.
pub fn test_config() -> Config {
    let mut config = Config::from_env();
    config.jwt_secret = SecretString::from(TEST_SECRET.to_string());
    config.jwt_expiration_hours = 1;
    config.review_policy = ReviewPolicy::default();
    config.campus_clock = CampusClock::default();
    config.scheduler_enabled = false;
    config.scheduler_retry_delay = std::time::Duration::from_millis(5);
    config.schedule_retention_days = 30;
    config
}

/// Seeds a problem with a fixed id.
pub async fn seed_problem(backend: &Backend, id: &str, answer: &str) -> Problem {
    let mut problem = Problem::new(&format!("Problem {}", id), "Solve", "math", answer, "teacher-1");
    problem.id = id.to_string();
    backend.problems.create(problem).await.unwrap()
}

/// Seeds a user with a fixed id.
pub async fn seed_user(backend: &Backend, id: &str, role: woodie_campus_server::models::domain::UserRole) -> User {
    let mut user = User::new(id, &format!("{}@example.com", id), role);
    user.id = id.to_string();
    backend.users.create(user).await.unwrap()
}
