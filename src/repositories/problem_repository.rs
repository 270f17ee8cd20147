use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::Problem,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProblemRepository: Send + Sync {
    async fn create(&self, problem: Problem) -> AppResult<Problem>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Problem>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoProblemRepository {
    collection: Collection<Problem>,
}

impl MongoProblemRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::PROBLEMS);
        Self { collection }
    }
}

#[async_trait]
impl ProblemRepository for MongoProblemRepository {
    async fn create(&self, problem: Problem) -> AppResult<Problem> {
        self.collection.insert_one(&problem).await?;
        Ok(problem)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Problem>> {
        let problem = self.collection.find_one(doc! { "id": id }).await?;
        Ok(problem)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        Ok(())
    }
}
