use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::SolutionRecord,
        dto::{request::SubmitSolutionRequest, response::SolutionRecordDto},
    },
    repositories::{
        ProblemRepository, ReviewScheduleRepository, SolutionRecordRepository, WorkbookRepository,
    },
    services::{
        mastery::{MasteryLevel, ReviewPolicy},
        review_service::reschedule_problem,
        review_targets::latest_per_problem,
    },
};

pub struct SolutionService {
    problems: Arc<dyn ProblemRepository>,
    workbooks: Arc<dyn WorkbookRepository>,
    solutions: Arc<dyn SolutionRecordRepository>,
    schedules: Arc<dyn ReviewScheduleRepository>,
    policy: ReviewPolicy,
}

impl SolutionService {
    pub fn new(
        problems: Arc<dyn ProblemRepository>,
        workbooks: Arc<dyn WorkbookRepository>,
        solutions: Arc<dyn SolutionRecordRepository>,
        schedules: Arc<dyn ReviewScheduleRepository>,
        policy: ReviewPolicy,
    ) -> Self {
        Self {
            problems,
            workbooks,
            solutions,
            schedules,
            policy,
        }
    }

    /// Grades the answer and appends a new record. Mastery carries over from
    /// the previous record of the same problem.
    pub async fn submit_solution(
        &self,
        user_id: &str,
        request: SubmitSolutionRequest,
        now: DateTime<Utc>,
    ) -> AppResult<SolutionRecordDto> {
        request.validate()?;

        let problem = self
            .problems
            .find_by_id(&request.problem_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Problem '{}' not found", request.problem_id)))?;

        if let Some(workbook_id) = &request.workbook_id {
            self.ensure_problem_in_workbook(workbook_id, &problem.id).await?;
        }

        let history = self
            .solutions
            .find_by_user_and_problem(user_id, &problem.id)
            .await?;
        let attempt_number = history.len() as i32 + 1;
        let previous_level = latest_per_problem(history)
            .into_iter()
            .next()
            .map(|r| r.mastery_level)
            .unwrap_or(MasteryLevel::NEW);

        let is_correct = problem.is_correct_answer(&request.answer);
        let transition = self.policy.apply(previous_level, is_correct, now);

        let mut record = SolutionRecord::new(user_id, &problem.id, &request.answer, is_correct);
        record.workbook_id = request.workbook_id;
        record.attempt_number = attempt_number;
        record.mastery_level = transition.level;
        record.next_review_date = transition.next_review_date;
        record.created_at = now;
        let record = self.solutions.create(record).await?;

        reschedule_problem(self.schedules.as_ref(), user_id, &problem.id, &transition, now).await?;

        log::info!(
            "Solution submitted: user={} problem={} attempt={} correct={}",
            user_id,
            problem.id,
            attempt_number,
            is_correct
        );

        Ok(record.into())
    }

    pub async fn list_solutions(
        &self,
        user_id: &str,
        problem_id: Option<&str>,
    ) -> AppResult<Vec<SolutionRecordDto>> {
        let mut records = match problem_id {
            Some(pid) => self.solutions.find_by_user_and_problem(user_id, pid).await?,
            None => self.solutions.find_by_user(user_id).await?,
        };
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(records.into_iter().map(SolutionRecordDto::from).collect())
    }

    async fn ensure_problem_in_workbook(&self, workbook_id: &str, problem_id: &str) -> AppResult<()> {
        self.workbooks
            .find_by_id(workbook_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Workbook '{}' not found", workbook_id)))?;

        let contains = self
            .workbooks
            .find_problems(workbook_id)
            .await?
            .iter()
            .any(|entry| entry.problem_id == problem_id);

        if !contains {
            return Err(AppError::ValidationError(format!(
                "Problem '{}' is not part of workbook '{}'",
                problem_id, workbook_id
            )));
        }
        Ok(())
    }
}
