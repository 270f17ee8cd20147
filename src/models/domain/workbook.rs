use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Workbook {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_by: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Workbook {
    pub fn new(title: &str, created_by: &str) -> Self {
        Workbook {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: None,
            created_by: created_by.to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// Membership of a problem in a workbook; `order_index` runs 0..n.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkbookProblem {
    pub id: String,
    pub workbook_id: String,
    pub problem_id: String,
    pub order_index: i32,
}

impl WorkbookProblem {
    pub fn new(workbook_id: &str, problem_id: &str, order_index: i32) -> Self {
        WorkbookProblem {
            id: Uuid::new_v4().to_string(),
            workbook_id: workbook_id.to_string(),
            problem_id: problem_id.to_string(),
            order_index,
        }
    }
}
