use std::{fmt, sync::Arc};

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Serialize;

use crate::{
    errors::AppResult,
    models::domain::{ReviewReminder, User},
    repositories::{
        DailyStatsRepository, ReviewReminderRepository, ReviewScheduleRepository,
        SolutionRecordRepository, UserRepository, WorkbookReviewScheduleRepository,
    },
    services::{campus_clock::CampusClock, review_targets::select_today_targets},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    DailyStatsReset,
    DailyTargetPrecalculation,
    ExpiredScheduleCleanup,
    ReminderPreparation,
}

impl JobKind {
    pub const ALL: [JobKind; 4] = [
        JobKind::DailyStatsReset,
        JobKind::DailyTargetPrecalculation,
        JobKind::ExpiredScheduleCleanup,
        JobKind::ReminderPreparation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            JobKind::DailyStatsReset => "daily_stats_reset",
            JobKind::DailyTargetPrecalculation => "daily_target_precalculation",
            JobKind::ExpiredScheduleCleanup => "expired_schedule_cleanup",
            JobKind::ReminderPreparation => "reminder_preparation",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Campus wall-clock time of the daily run.
    pub fn runs_at(&self) -> NaiveTime {
        let (hour, minute) = match self {
            JobKind::DailyStatsReset => (0, 0),
            JobKind::DailyTargetPrecalculation => (0, 5),
            JobKind::ExpiredScheduleCleanup => (2, 0),
            JobKind::ReminderPreparation => (8, 0),
        };
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobOutcome {
    pub affected: u64,
    pub summary: String,
}

/// Everything the batch jobs read and write.
pub struct JobContext {
    pub users: Arc<dyn UserRepository>,
    pub solutions: Arc<dyn SolutionRecordRepository>,
    pub schedules: Arc<dyn ReviewScheduleRepository>,
    pub workbook_schedules: Arc<dyn WorkbookReviewScheduleRepository>,
    pub stats: Arc<dyn DailyStatsRepository>,
    pub reminders: Arc<dyn ReviewReminderRepository>,
    pub clock: CampusClock,
    pub retention_days: i64,
}

impl JobKind {
    pub async fn execute(&self, ctx: &JobContext, now: DateTime<Utc>) -> AppResult<JobOutcome> {
        match self {
            JobKind::DailyStatsReset => reset_daily_stats(ctx, now).await,
            JobKind::DailyTargetPrecalculation => precalculate_targets(ctx, now).await,
            JobKind::ExpiredScheduleCleanup => cleanup_expired_schedules(ctx, now).await,
            JobKind::ReminderPreparation => prepare_reminders(ctx, now).await,
        }
    }
}

async fn reset_daily_stats(ctx: &JobContext, now: DateTime<Utc>) -> AppResult<JobOutcome> {
    let today = ctx.clock.today(now);
    let users = ctx.users.find_active().await?;

    for user in &users {
        ctx.stats.reset(&user.id, today).await?;
    }

    Ok(JobOutcome {
        affected: users.len() as u64,
        summary: format!("reset stats for {} users on {}", users.len(), today),
    })
}

async fn count_today_targets(ctx: &JobContext, user: &User, now: DateTime<Utc>) -> AppResult<usize> {
    let records = ctx.solutions.find_by_user(&user.id).await?;
    Ok(select_today_targets(records, ctx.clock.end_of_day(now)).len())
}

async fn precalculate_targets(ctx: &JobContext, now: DateTime<Utc>) -> AppResult<JobOutcome> {
    let today = ctx.clock.today(now);
    let users = ctx.users.find_active().await?;
    let mut total_targets = 0;

    for user in &users {
        let count = count_today_targets(ctx, user, now).await?;
        ctx.stats.set_target_count(&user.id, today, count as i32).await?;
        total_targets += count;
    }

    Ok(JobOutcome {
        affected: users.len() as u64,
        summary: format!("{} targets across {} users", total_targets, users.len()),
    })
}

async fn cleanup_expired_schedules(ctx: &JobContext, now: DateTime<Utc>) -> AppResult<JobOutcome> {
    let cutoff = now - Duration::days(ctx.retention_days);
    let problems = ctx.schedules.delete_completed_before(cutoff).await?;
    let workbooks = ctx.workbook_schedules.delete_completed_before(cutoff).await?;

    Ok(JobOutcome {
        affected: problems + workbooks,
        summary: format!(
            "removed {} problem and {} workbook schedules completed before {}",
            problems, workbooks, cutoff
        ),
    })
}

async fn prepare_reminders(ctx: &JobContext, now: DateTime<Utc>) -> AppResult<JobOutcome> {
    let today = ctx.clock.today(now);
    let end_of_day = ctx.clock.end_of_day(now);
    let users = ctx.users.find_active().await?;
    let mut prepared = 0;

    for user in &users {
        let problems = count_today_targets(ctx, user, now).await?;
        let workbooks = ctx
            .workbook_schedules
            .find_pending_by_user(&user.id)
            .await?
            .iter()
            .filter(|s| s.scheduled_date <= end_of_day)
            .count();

        let due_count = problems + workbooks;
        if due_count == 0 {
            continue;
        }

        ctx.reminders
            .upsert(ReviewReminder {
                user_id: user.id.clone(),
                reminder_date: today,
                due_count: due_count as i32,
                prepared_at: now,
            })
            .await?;
        prepared += 1;
    }

    Ok(JobOutcome {
        affected: prepared,
        summary: format!("prepared {} reminders for {}", prepared, today),
    })
}
