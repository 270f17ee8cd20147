use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteReviewRequest {
    pub is_correct: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PriorityTargetsQuery {
    #[validate(range(min = 0, max = 3650))]
    pub max_overdue_days: Option<i64>,

    #[validate(range(min = 1, max = 200))]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleQuery {
    #[serde(default)]
    pub include_completed: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSolutionRequest {
    #[validate(length(min = 1, max = 64))]
    pub problem_id: String,

    #[validate(length(min = 1, max = 64))]
    pub workbook_id: Option<String>,

    #[validate(length(max = 2000))]
    pub answer: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionQuery {
    pub problem_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReorderProblemsRequest {
    #[validate(length(max = 500))]
    pub problem_ids: Vec<String>,
}
