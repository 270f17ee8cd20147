use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::SolutionRecord,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SolutionRecordRepository: Send + Sync {
    async fn create(&self, record: SolutionRecord) -> AppResult<SolutionRecord>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<SolutionRecord>>;
    async fn update(&self, record: SolutionRecord) -> AppResult<SolutionRecord>;
    /// Newest first.
    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<SolutionRecord>>;
    /// Newest first.
    async fn find_by_user_and_problem(
        &self,
        user_id: &str,
        problem_id: &str,
    ) -> AppResult<Vec<SolutionRecord>>;
    async fn find_by_user_for_problems(
        &self,
        user_id: &str,
        problem_ids: Vec<String>,
    ) -> AppResult<Vec<SolutionRecord>>;
}

pub struct MongoSolutionRecordRepository {
    collection: Collection<SolutionRecord>,
}

impl MongoSolutionRecordRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::SOLUTION_RECORDS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for solution_records collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_problem_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "problem_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_problem".to_string())
                    .build(),
            )
            .build();

        let user_created_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_created".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_problem_index).await?;
        self.collection.create_index(user_created_index).await?;

        log::info!("Successfully created indexes for solution_records collection");
        Ok(())
    }
}

#[async_trait]
impl SolutionRecordRepository for MongoSolutionRecordRepository {
    async fn create(&self, record: SolutionRecord) -> AppResult<SolutionRecord> {
        self.collection.insert_one(&record).await?;
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<SolutionRecord>> {
        let record = self.collection.find_one(doc! { "id": id }).await?;
        Ok(record)
    }

    async fn update(&self, record: SolutionRecord) -> AppResult<SolutionRecord> {
        let result = self
            .collection
            .replace_one(doc! { "id": record.id.as_str() }, &record)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Solution record '{}' not found",
                record.id
            )));
        }

        Ok(record)
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<SolutionRecord>> {
        let records = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(records)
    }

    async fn find_by_user_and_problem(
        &self,
        user_id: &str,
        problem_id: &str,
    ) -> AppResult<Vec<SolutionRecord>> {
        let records = self
            .collection
            .find(doc! { "user_id": user_id, "problem_id": problem_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(records)
    }

    async fn find_by_user_for_problems(
        &self,
        user_id: &str,
        problem_ids: Vec<String>,
    ) -> AppResult<Vec<SolutionRecord>> {
        if problem_ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = self
            .collection
            .find(doc! {
                "user_id": user_id,
                "problem_id": { "$in": problem_ids }
            })
            .await?
            .try_collect()
            .await?;
        Ok(records)
    }
}
