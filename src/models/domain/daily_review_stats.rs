use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Per-user counters for one campus day, unique on (user_id, stat_date).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DailyReviewStats {
    pub user_id: String,
    pub stat_date: NaiveDate,
    pub target_count: i32,
    pub completed_count: i32,
    pub correct_count: i32,
    pub updated_at: DateTime<Utc>,
}

impl DailyReviewStats {
    pub fn empty(user_id: &str, stat_date: NaiveDate) -> Self {
        DailyReviewStats {
            user_id: user_id.to_string(),
            stat_date,
            target_count: 0,
            completed_count: 0,
            correct_count: 0,
            updated_at: Utc::now(),
        }
    }
}

/// Prepared once a day for users with reviews due.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReviewReminder {
    pub user_id: String,
    pub reminder_date: NaiveDate,
    pub due_count: i32,
    pub prepared_at: DateTime<Utc>,
}
