use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{DailyReviewStats, ReviewSchedule, WorkbookReviewSchedule},
        dto::response::{
            DailyStatsDto, PriorityTargetDto, ReviewScheduleDto, SolutionRecordDto,
            WorkbookReviewCompletionDto, WorkbookReviewScheduleDto,
        },
    },
    repositories::{
        DailyStatsRepository, ReviewScheduleRepository, SolutionRecordRepository,
        WorkbookReviewScheduleRepository,
    },
    services::{
        campus_clock::CampusClock,
        mastery::{ReviewPolicy, ReviewTransition},
        review_targets::{latest_per_problem, rank_priority_targets, select_today_targets},
    },
};

pub struct ReviewService {
    solutions: Arc<dyn SolutionRecordRepository>,
    schedules: Arc<dyn ReviewScheduleRepository>,
    workbook_schedules: Arc<dyn WorkbookReviewScheduleRepository>,
    stats: Arc<dyn DailyStatsRepository>,
    policy: ReviewPolicy,
    clock: CampusClock,
}

impl ReviewService {
    pub fn new(
        solutions: Arc<dyn SolutionRecordRepository>,
        schedules: Arc<dyn ReviewScheduleRepository>,
        workbook_schedules: Arc<dyn WorkbookReviewScheduleRepository>,
        stats: Arc<dyn DailyStatsRepository>,
        policy: ReviewPolicy,
        clock: CampusClock,
    ) -> Self {
        Self {
            solutions,
            schedules,
            workbook_schedules,
            stats,
            policy,
            clock,
        }
    }

    pub async fn today_targets(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<Vec<SolutionRecordDto>> {
        let records = self.solutions.find_by_user(user_id).await?;
        let targets = select_today_targets(records, self.clock.end_of_day(now));

        Ok(targets.into_iter().map(SolutionRecordDto::from).collect())
    }

    pub async fn priority_targets(
        &self,
        user_id: &str,
        max_overdue_days: Option<i64>,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<PriorityTargetDto>> {
        let records = self.solutions.find_by_user(user_id).await?;
        let ranked = rank_priority_targets(
            records,
            now,
            self.clock.end_of_day(now),
            max_overdue_days,
            limit,
        );

        Ok(ranked.into_iter().map(PriorityTargetDto::from).collect())
    }

    /// Applies a review result to the record in place, rotates the problem's
    /// schedule and counts the review in today's stats. Only the latest
    /// record of a problem can be reviewed.
    pub async fn complete_review(
        &self,
        user_id: &str,
        record_id: &str,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> AppResult<SolutionRecordDto> {
        let mut record = self
            .solutions
            .find_by_id(record_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Solution record '{}' not found", record_id)))?;

        if record.user_id != user_id {
            return Err(AppError::Forbidden(
                "You can only review your own solution records".to_string(),
            ));
        }

        let live = latest_per_problem(
            self.solutions
                .find_by_user_and_problem(user_id, &record.problem_id)
                .await?,
        );
        if live.iter().any(|r| r.id != record.id) {
            return Err(AppError::ValidationError(format!(
                "Solution record '{}' has been superseded by a newer submission",
                record_id
            )));
        }

        let previous_level = record.mastery_level;
        let transition = self.policy.apply(previous_level, is_correct, now);

        record.mastery_level = transition.level;
        record.next_review_date = transition.next_review_date;
        record.last_reviewed_at = Some(now);
        let record = self.solutions.update(record).await?;

        reschedule_problem(
            self.schedules.as_ref(),
            user_id,
            &record.problem_id,
            &transition,
            now,
        )
        .await?;

        self.stats
            .record_review(user_id, self.clock.today(now), is_correct)
            .await?;

        log::info!(
            "Review completed: user={} problem={} correct={} level {} -> {}",
            user_id,
            record.problem_id,
            is_correct,
            previous_level,
            transition.level
        );

        Ok(record.into())
    }

    pub async fn list_schedules(
        &self,
        user_id: &str,
        include_completed: bool,
    ) -> AppResult<Vec<ReviewScheduleDto>> {
        let mut schedules = self.schedules.find_by_user(user_id, include_completed).await?;
        schedules.sort_by(|a, b| a.scheduled_date.cmp(&b.scheduled_date));

        Ok(schedules.into_iter().map(ReviewScheduleDto::from).collect())
    }

    pub async fn today_workbook_reviews(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<WorkbookReviewScheduleDto>> {
        let end_of_day = self.clock.end_of_day(now);
        let mut due: Vec<_> = self
            .workbook_schedules
            .find_pending_by_user(user_id)
            .await?
            .into_iter()
            .filter(|s| s.scheduled_date <= end_of_day)
            .collect();
        due.sort_by(|a, b| a.scheduled_date.cmp(&b.scheduled_date));

        Ok(due.into_iter().map(WorkbookReviewScheduleDto::from).collect())
    }

    pub async fn complete_workbook_review(
        &self,
        user_id: &str,
        schedule_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<WorkbookReviewCompletionDto> {
        let mut schedule = self
            .workbook_schedules
            .find_by_id(schedule_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Workbook review schedule '{}' not found", schedule_id))
            })?;

        if schedule.user_id != user_id {
            return Err(AppError::Forbidden(
                "You can only complete your own workbook reviews".to_string(),
            ));
        }
        if schedule.is_completed {
            return Err(AppError::ValidationError(
                "Workbook review is already completed".to_string(),
            ));
        }

        schedule.complete(now);
        let completed = self.workbook_schedules.update(schedule).await?;

        let next = match self.policy.next_stage_date(completed.review_stage, now) {
            Some((stage, date)) => {
                let next = WorkbookReviewSchedule::new(
                    user_id,
                    &completed.workbook_id,
                    date,
                    stage,
                );
                Some(self.workbook_schedules.create(next).await?.into())
            }
            None => None,
        };

        Ok(WorkbookReviewCompletionDto {
            completed: completed.into(),
            next,
        })
    }

    pub async fn today_stats(&self, user_id: &str, now: DateTime<Utc>) -> AppResult<DailyStatsDto> {
        let today = self.clock.today(now);
        let stats = self
            .stats
            .find(user_id, today)
            .await?
            .unwrap_or_else(|| DailyReviewStats::empty(user_id, today));

        Ok(stats.into())
    }
}

/// Closes every pending schedule of the problem and opens the next one
/// unless the problem just retired.
pub(crate) async fn reschedule_problem(
    schedules: &dyn ReviewScheduleRepository,
    user_id: &str,
    problem_id: &str,
    transition: &ReviewTransition,
    now: DateTime<Utc>,
) -> AppResult<()> {
    for mut pending in schedules.find_pending_for_problem(user_id, problem_id).await? {
        pending.complete(now);
        schedules.update(pending).await?;
    }

    if !transition.level.is_retired() {
        let next = ReviewSchedule::new(
            user_id,
            problem_id,
            transition.next_review_date,
            transition.level.into(),
        );
        schedules.create(next).await?;
    }

    Ok(())
}
