use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use mongodb::{
    bson::{doc, to_bson},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::{DailyReviewStats, ReviewReminder},
};

/// Counters are keyed by (user_id, stat_date); every write is an upsert.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DailyStatsRepository: Send + Sync {
    async fn find(&self, user_id: &str, date: NaiveDate) -> AppResult<Option<DailyReviewStats>>;
    async fn reset(&self, user_id: &str, date: NaiveDate) -> AppResult<()>;
    async fn set_target_count(&self, user_id: &str, date: NaiveDate, count: i32) -> AppResult<()>;
    async fn record_review(&self, user_id: &str, date: NaiveDate, is_correct: bool) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewReminderRepository: Send + Sync {
    async fn upsert(&self, reminder: ReviewReminder) -> AppResult<()>;
    async fn find_for_date(&self, date: NaiveDate) -> AppResult<Vec<ReviewReminder>>;
}

pub struct MongoDailyStatsRepository {
    collection: Collection<DailyReviewStats>,
}

impl MongoDailyStatsRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::DAILY_REVIEW_STATS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "stat_date": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_date_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(model).await?;
        Ok(())
    }
}

#[async_trait]
impl DailyStatsRepository for MongoDailyStatsRepository {
    async fn find(&self, user_id: &str, date: NaiveDate) -> AppResult<Option<DailyReviewStats>> {
        let stats = self
            .collection
            .find_one(doc! { "user_id": user_id, "stat_date": date.to_string() })
            .await?;
        Ok(stats)
    }

    async fn reset(&self, user_id: &str, date: NaiveDate) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "user_id": user_id, "stat_date": date.to_string() },
                doc! {
                    "$set": {
                        "target_count": 0,
                        "completed_count": 0,
                        "correct_count": 0,
                        "updated_at": to_bson(&Utc::now())?,
                    }
                },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn set_target_count(&self, user_id: &str, date: NaiveDate, count: i32) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "user_id": user_id, "stat_date": date.to_string() },
                doc! {
                    "$set": {
                        "target_count": count,
                        "updated_at": to_bson(&Utc::now())?,
                    },
                    "$setOnInsert": { "completed_count": 0, "correct_count": 0 }
                },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn record_review(&self, user_id: &str, date: NaiveDate, is_correct: bool) -> AppResult<()> {
        let correct_increment = if is_correct { 1 } else { 0 };
        self.collection
            .update_one(
                doc! { "user_id": user_id, "stat_date": date.to_string() },
                doc! {
                    "$inc": { "completed_count": 1, "correct_count": correct_increment },
                    "$set": { "updated_at": to_bson(&Utc::now())? },
                    "$setOnInsert": { "target_count": 0 }
                },
            )
            .upsert(true)
            .await?;
        Ok(())
    }
}

pub struct MongoReviewReminderRepository {
    collection: Collection<ReviewReminder>,
}

impl MongoReviewReminderRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::REVIEW_REMINDERS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "reminder_date": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_reminder_date_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(model).await?;
        Ok(())
    }
}

#[async_trait]
impl ReviewReminderRepository for MongoReviewReminderRepository {
    async fn upsert(&self, reminder: ReviewReminder) -> AppResult<()> {
        self.collection
            .replace_one(
                doc! {
                    "user_id": reminder.user_id.as_str(),
                    "reminder_date": reminder.reminder_date.to_string()
                },
                &reminder,
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn find_for_date(&self, date: NaiveDate) -> AppResult<Vec<ReviewReminder>> {
        use futures::TryStreamExt;

        let reminders = self
            .collection
            .find(doc! { "reminder_date": date.to_string() })
            .await?
            .try_collect()
            .await?;
        Ok(reminders)
    }
}
