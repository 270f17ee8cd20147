use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::mastery::MasteryLevel;

/// One answer submission. The log is append-only; review completion
/// mutates `mastery_level` and `next_review_date` of the latest record.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SolutionRecord {
    pub id: String,
    pub user_id: String,
    pub problem_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workbook_id: Option<String>,
    pub submitted_answer: String,
    pub is_correct: bool,
    pub attempt_number: i32,
    pub mastery_level: MasteryLevel,
    pub next_review_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SolutionRecord {
    pub fn new(user_id: &str, problem_id: &str, submitted_answer: &str, is_correct: bool) -> Self {
        let now = Utc::now();
        SolutionRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            problem_id: problem_id.to_string(),
            workbook_id: None,
            submitted_answer: submitted_answer.to_string(),
            is_correct,
            attempt_number: 1,
            mastery_level: MasteryLevel::NEW,
            next_review_date: now,
            last_reviewed_at: None,
            created_at: now,
        }
    }

    pub fn is_retired(&self) -> bool {
        self.mastery_level.is_retired()
    }
}
