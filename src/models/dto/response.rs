use async_graphql::SimpleObject;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    models::domain::{DailyReviewStats, ReviewSchedule, SolutionRecord, WorkbookProblem, WorkbookReviewSchedule},
    services::review_targets::PriorityTarget,
};

/// `{ success, data?, message? }` envelope returned by every REST handler.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct SolutionRecordDto {
    pub id: String,
    pub problem_id: String,
    pub workbook_id: Option<String>,
    pub submitted_answer: String,
    pub is_correct: bool,
    pub attempt_number: i32,
    pub mastery_level: i32,
    pub next_review_date: DateTime<Utc>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<SolutionRecord> for SolutionRecordDto {
    fn from(record: SolutionRecord) -> Self {
        SolutionRecordDto {
            id: record.id,
            problem_id: record.problem_id,
            workbook_id: record.workbook_id,
            submitted_answer: record.submitted_answer,
            is_correct: record.is_correct,
            attempt_number: record.attempt_number,
            mastery_level: record.mastery_level.into(),
            next_review_date: record.next_review_date,
            last_reviewed_at: record.last_reviewed_at,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct PriorityTargetDto {
    pub record: SolutionRecordDto,
    pub overdue_days: i64,
}

impl From<PriorityTarget> for PriorityTargetDto {
    fn from(target: PriorityTarget) -> Self {
        PriorityTargetDto {
            record: target.record.into(),
            overdue_days: target.overdue_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct ReviewScheduleDto {
    pub id: String,
    pub problem_id: String,
    pub scheduled_date: DateTime<Utc>,
    pub review_stage: i32,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<ReviewSchedule> for ReviewScheduleDto {
    fn from(schedule: ReviewSchedule) -> Self {
        ReviewScheduleDto {
            id: schedule.id,
            problem_id: schedule.problem_id,
            scheduled_date: schedule.scheduled_date,
            review_stage: schedule.review_stage,
            is_completed: schedule.is_completed,
            completed_at: schedule.completed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookReviewScheduleDto {
    pub id: String,
    pub workbook_id: String,
    pub scheduled_date: DateTime<Utc>,
    pub review_stage: i32,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<WorkbookReviewSchedule> for WorkbookReviewScheduleDto {
    fn from(schedule: WorkbookReviewSchedule) -> Self {
        WorkbookReviewScheduleDto {
            id: schedule.id,
            workbook_id: schedule.workbook_id,
            scheduled_date: schedule.scheduled_date,
            review_stage: schedule.review_stage,
            is_completed: schedule.is_completed,
            completed_at: schedule.completed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookReviewCompletionDto {
    pub completed: WorkbookReviewScheduleDto,
    pub next: Option<WorkbookReviewScheduleDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatsDto {
    pub date: NaiveDate,
    pub target_count: i32,
    pub completed_count: i32,
    pub correct_count: i32,
    pub accuracy_percentage: i32,
}

impl From<DailyReviewStats> for DailyStatsDto {
    fn from(stats: DailyReviewStats) -> Self {
        DailyStatsDto {
            date: stats.stat_date,
            target_count: stats.target_count,
            completed_count: stats.completed_count,
            correct_count: stats.correct_count,
            accuracy_percentage: percentage(stats.correct_count as usize, stats.completed_count as usize),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookProblemDto {
    pub problem_id: String,
    pub order_index: i32,
}

impl From<WorkbookProblem> for WorkbookProblemDto {
    fn from(entry: WorkbookProblem) -> Self {
        WorkbookProblemDto {
            problem_id: entry.problem_id,
            order_index: entry.order_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookProblemStatusDto {
    pub problem_id: String,
    pub order_index: i32,
    pub attempted: bool,
    pub solved: bool,
    pub mastery_level: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookProgressDto {
    pub workbook_id: String,
    pub total: i32,
    pub solved: i32,
    pub percentage: i32,
    pub problems: Vec<WorkbookProblemStatusDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusDto {
    pub name: String,
    pub runs_at: String,
    pub running: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub last_outcome: Option<String>,
    pub last_error: Option<String>,
    pub next_run: Option<DateTime<Utc>>,
    pub run_count: u32,
    pub failure_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStatusDto {
    pub active: bool,
    pub jobs: Vec<JobStatusDto>,
}

/// Rounded share in percent; an empty denominator gives 0.
pub fn percentage(part: usize, total: usize) -> i32 {
    if total == 0 {
        return 0;
    }
    (part as f64 * 100.0 / total as f64).round() as i32
}
