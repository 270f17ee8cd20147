use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pending re-practice of a single problem. Completed entries are kept
/// until the cleanup job removes them.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReviewSchedule {
    pub id: String,
    pub user_id: String,
    pub problem_id: String,
    pub scheduled_date: DateTime<Utc>,
    pub review_stage: i32,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "completed_at_format")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ReviewSchedule {
    pub fn new(user_id: &str, problem_id: &str, scheduled_date: DateTime<Utc>, review_stage: i32) -> Self {
        ReviewSchedule {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            problem_id: problem_id.to_string(),
            scheduled_date,
            review_stage,
            is_completed: false,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.is_completed = true;
        self.completed_at = Some(at);
    }
}

/// Same as [`ReviewSchedule`] but for a whole workbook.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkbookReviewSchedule {
    pub id: String,
    pub user_id: String,
    pub workbook_id: String,
    pub scheduled_date: DateTime<Utc>,
    pub review_stage: i32,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "completed_at_format")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl WorkbookReviewSchedule {
    pub fn new(user_id: &str, workbook_id: &str, scheduled_date: DateTime<Utc>, review_stage: i32) -> Self {
        WorkbookReviewSchedule {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            workbook_id: workbook_id.to_string(),
            scheduled_date,
            review_stage,
            is_completed: false,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.is_completed = true;
        self.completed_at = Some(at);
    }
}

/// Completion times are stored as BSON dates so the cleanup job can filter
/// them with `$lt` on the server.
pub(crate) mod completed_at_format {
    use chrono::{DateTime, Utc};
    use mongodb::bson::DateTime as BsonDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    pub fn to_bson(at: DateTime<Utc>) -> BsonDateTime {
        BsonDateTime::from_millis(at.timestamp_millis())
    }

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
        value.map(to_bson).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<BsonDateTime>::deserialize(deserializer)?
            .map(|at| {
                DateTime::from_timestamp_millis(at.timestamp_millis())
                    .ok_or_else(|| D::Error::custom("completed_at out of range"))
            })
            .transpose()
    }
}
