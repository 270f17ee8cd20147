use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{SolutionRecord, Workbook, WorkbookProblem},
        dto::{
            request::ReorderProblemsRequest,
            response::{percentage, WorkbookProblemDto, WorkbookProblemStatusDto, WorkbookProgressDto},
        },
    },
    repositories::{SolutionRecordRepository, WorkbookRepository},
    services::review_targets::latest_per_problem,
};

pub struct WorkbookService {
    workbooks: Arc<dyn WorkbookRepository>,
    solutions: Arc<dyn SolutionRecordRepository>,
}

impl WorkbookService {
    pub fn new(
        workbooks: Arc<dyn WorkbookRepository>,
        solutions: Arc<dyn SolutionRecordRepository>,
    ) -> Self {
        Self {
            workbooks,
            solutions,
        }
    }

    pub async fn problems(&self, workbook_id: &str) -> AppResult<Vec<WorkbookProblemDto>> {
        self.get_workbook(workbook_id).await?;
        let entries = self.workbooks.find_problems(workbook_id).await?;
        Ok(entries.into_iter().map(WorkbookProblemDto::from).collect())
    }

    pub async fn progress(&self, user_id: &str, workbook_id: &str) -> AppResult<WorkbookProgressDto> {
        self.get_workbook(workbook_id).await?;

        let entries = self.workbooks.find_problems(workbook_id).await?;
        let problem_ids: Vec<String> = entries.iter().map(|e| e.problem_id.clone()).collect();
        let records = self
            .solutions
            .find_by_user_for_problems(user_id, problem_ids)
            .await?;

        Ok(compute_progress(workbook_id, entries, records))
    }

    /// `problem_ids` must name every problem of the workbook exactly once.
    pub async fn reorder(
        &self,
        workbook_id: &str,
        request: ReorderProblemsRequest,
    ) -> AppResult<Vec<WorkbookProblemDto>> {
        request.validate()?;
        self.get_workbook(workbook_id).await?;

        let entries = self.workbooks.find_problems(workbook_id).await?;
        let renumbered = renumber(entries, &request.problem_ids)?;
        self.workbooks.update_order(renumbered.clone()).await?;

        log::info!("Reordered {} problems in workbook {}", renumbered.len(), workbook_id);

        Ok(renumbered.into_iter().map(WorkbookProblemDto::from).collect())
    }

    async fn get_workbook(&self, workbook_id: &str) -> AppResult<Workbook> {
        self.workbooks
            .find_by_id(workbook_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Workbook '{}' not found", workbook_id)))
    }
}

pub fn compute_progress(
    workbook_id: &str,
    mut entries: Vec<WorkbookProblem>,
    records: Vec<SolutionRecord>,
) -> WorkbookProgressDto {
    entries.sort_by_key(|e| e.order_index);

    let solved_ids: HashSet<&str> = records
        .iter()
        .filter(|r| r.is_correct)
        .map(|r| r.problem_id.as_str())
        .collect();
    let latest: HashMap<String, SolutionRecord> = latest_per_problem(records.clone())
        .into_iter()
        .map(|r| (r.problem_id.clone(), r))
        .collect();

    let problems: Vec<WorkbookProblemStatusDto> = entries
        .into_iter()
        .map(|entry| {
            let latest_record = latest.get(&entry.problem_id);
            WorkbookProblemStatusDto {
                solved: solved_ids.contains(entry.problem_id.as_str()),
                attempted: latest_record.is_some(),
                mastery_level: latest_record.map(|r| r.mastery_level.into()),
                problem_id: entry.problem_id,
                order_index: entry.order_index,
            }
        })
        .collect();

    let total = problems.len();
    let solved = problems.iter().filter(|p| p.solved).count();

    WorkbookProgressDto {
        workbook_id: workbook_id.to_string(),
        total: total as i32,
        solved: solved as i32,
        percentage: percentage(solved, total),
        problems,
    }
}

/// Assigns `order_index` 0..n following `problem_ids`.
pub fn renumber(entries: Vec<WorkbookProblem>, problem_ids: &[String]) -> AppResult<Vec<WorkbookProblem>> {
    let unique: HashSet<&String> = problem_ids.iter().collect();
    if unique.len() != problem_ids.len() {
        return Err(AppError::ValidationError(
            "Problem order contains duplicates".to_string(),
        ));
    }
    if problem_ids.len() != entries.len() {
        return Err(AppError::ValidationError(format!(
            "Expected {} problems in the new order, got {}",
            entries.len(),
            problem_ids.len()
        )));
    }

    let mut by_problem: HashMap<String, WorkbookProblem> = entries
        .into_iter()
        .map(|e| (e.problem_id.clone(), e))
        .collect();

    problem_ids
        .iter()
        .enumerate()
        .map(|(index, problem_id)| {
            let mut entry = by_problem.remove(problem_id).ok_or_else(|| {
                AppError::ValidationError(format!("Problem '{}' is not in this workbook", problem_id))
            })?;
            entry.order_index = index as i32;
            Ok(entry)
        })
        .collect()
}
