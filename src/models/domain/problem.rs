use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub difficulty: i32, // 1 (easiest) to 5
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub correct_answer: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Problem {
    pub fn new(title: &str, content: &str, subject: &str, correct_answer: &str, created_by: &str) -> Self {
        let now = Utc::now();
        Problem {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            content: content.to_string(),
            difficulty: 1,
            subject: subject.to_string(),
            topic: None,
            correct_answer: correct_answer.to_string(),
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Answers compare trimmed and case-insensitively.
    pub fn is_correct_answer(&self, answer: &str) -> bool {
        normalize_answer(answer) == normalize_answer(&self.correct_answer)
    }
}

fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}
