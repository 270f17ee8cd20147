use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::{review_schedule::completed_at_format, ReviewSchedule, WorkbookReviewSchedule},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewScheduleRepository: Send + Sync {
    async fn create(&self, schedule: ReviewSchedule) -> AppResult<ReviewSchedule>;
    async fn update(&self, schedule: ReviewSchedule) -> AppResult<ReviewSchedule>;
    async fn find_pending_for_problem(
        &self,
        user_id: &str,
        problem_id: &str,
    ) -> AppResult<Vec<ReviewSchedule>>;
    async fn find_by_user(
        &self,
        user_id: &str,
        include_completed: bool,
    ) -> AppResult<Vec<ReviewSchedule>>;
    /// Removes completed schedules finished before `cutoff`; returns how many.
    async fn delete_completed_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkbookReviewScheduleRepository: Send + Sync {
    async fn create(&self, schedule: WorkbookReviewSchedule) -> AppResult<WorkbookReviewSchedule>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<WorkbookReviewSchedule>>;
    async fn update(&self, schedule: WorkbookReviewSchedule) -> AppResult<WorkbookReviewSchedule>;
    async fn find_pending_by_user(&self, user_id: &str) -> AppResult<Vec<WorkbookReviewSchedule>>;
    async fn delete_completed_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

fn schedule_indexes() -> Vec<IndexModel> {
    vec![
        IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build(),
        IndexModel::builder()
            .keys(doc! { "user_id": 1, "is_completed": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_completed".to_string())
                    .build(),
            )
            .build(),
        IndexModel::builder()
            .keys(doc! { "is_completed": 1, "completed_at": 1 })
            .options(
                IndexOptions::builder()
                    .name("completed_at".to_string())
                    .build(),
            )
            .build(),
    ]
}

pub struct MongoReviewScheduleRepository {
    collection: Collection<ReviewSchedule>,
}

impl MongoReviewScheduleRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::REVIEW_SCHEDULES);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.collection.create_indexes(schedule_indexes()).await?;
        log::info!("Successfully created indexes for review_schedules collection");
        Ok(())
    }
}

#[async_trait]
impl ReviewScheduleRepository for MongoReviewScheduleRepository {
    async fn create(&self, schedule: ReviewSchedule) -> AppResult<ReviewSchedule> {
        self.collection.insert_one(&schedule).await?;
        Ok(schedule)
    }

    async fn update(&self, schedule: ReviewSchedule) -> AppResult<ReviewSchedule> {
        let result = self
            .collection
            .replace_one(doc! { "id": schedule.id.as_str() }, &schedule)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Review schedule '{}' not found",
                schedule.id
            )));
        }
        Ok(schedule)
    }

    async fn find_pending_for_problem(
        &self,
        user_id: &str,
        problem_id: &str,
    ) -> AppResult<Vec<ReviewSchedule>> {
        let schedules = self
            .collection
            .find(doc! {
                "user_id": user_id,
                "problem_id": problem_id,
                "is_completed": false
            })
            .await?
            .try_collect()
            .await?;
        Ok(schedules)
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        include_completed: bool,
    ) -> AppResult<Vec<ReviewSchedule>> {
        let mut filter = doc! { "user_id": user_id };
        if !include_completed {
            filter.insert("is_completed", false);
        }

        let schedules = self
            .collection
            .find(filter)
            .await?
            .try_collect()
            .await?;
        Ok(schedules)
    }

    async fn delete_completed_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! {
                "is_completed": true,
                "completed_at": { "$lt": completed_at_format::to_bson(cutoff) }
            })
            .await?;
        Ok(result.deleted_count)
    }
}

pub struct MongoWorkbookReviewScheduleRepository {
    collection: Collection<WorkbookReviewSchedule>,
}

impl MongoWorkbookReviewScheduleRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::WORKBOOK_REVIEW_SCHEDULES);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.collection.create_indexes(schedule_indexes()).await?;
        log::info!("Successfully created indexes for workbook_review_schedules collection");
        Ok(())
    }
}

#[async_trait]
impl WorkbookReviewScheduleRepository for MongoWorkbookReviewScheduleRepository {
    async fn create(&self, schedule: WorkbookReviewSchedule) -> AppResult<WorkbookReviewSchedule> {
        self.collection.insert_one(&schedule).await?;
        Ok(schedule)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<WorkbookReviewSchedule>> {
        let schedule = self.collection.find_one(doc! { "id": id }).await?;
        Ok(schedule)
    }

    async fn update(&self, schedule: WorkbookReviewSchedule) -> AppResult<WorkbookReviewSchedule> {
        let result = self
            .collection
            .replace_one(doc! { "id": schedule.id.as_str() }, &schedule)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Workbook review schedule '{}' not found",
                schedule.id
            )));
        }
        Ok(schedule)
    }

    async fn find_pending_by_user(&self, user_id: &str) -> AppResult<Vec<WorkbookReviewSchedule>> {
        let schedules = self
            .collection
            .find(doc! { "user_id": user_id, "is_completed": false })
            .await?
            .try_collect()
            .await?;
        Ok(schedules)
    }

    async fn delete_completed_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! {
                "is_completed": true,
                "completed_at": { "$lt": completed_at_format::to_bson(cutoff) }
            })
            .await?;
        Ok(result.deleted_count)
    }
}
