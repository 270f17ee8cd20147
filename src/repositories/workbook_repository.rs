use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::{Workbook, WorkbookProblem},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkbookRepository: Send + Sync {
    async fn create(&self, workbook: Workbook) -> AppResult<Workbook>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Workbook>>;
    async fn add_problem(&self, entry: WorkbookProblem) -> AppResult<WorkbookProblem>;
    /// Ordered by `order_index`.
    async fn find_problems(&self, workbook_id: &str) -> AppResult<Vec<WorkbookProblem>>;
    async fn update_order(&self, entries: Vec<WorkbookProblem>) -> AppResult<()>;
}

pub struct MongoWorkbookRepository {
    workbooks: Collection<Workbook>,
    workbook_problems: Collection<WorkbookProblem>,
}

impl MongoWorkbookRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            workbooks: db.get_collection(collections::WORKBOOKS),
            workbook_problems: db.get_collection(collections::WORKBOOK_PROBLEMS),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let membership_index = IndexModel::builder()
            .keys(doc! { "workbook_id": 1, "problem_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("workbook_problem_unique".to_string())
                    .build(),
            )
            .build();

        self.workbooks.create_index(id_index).await?;
        self.workbook_problems.create_index(membership_index).await?;
        Ok(())
    }
}

#[async_trait]
impl WorkbookRepository for MongoWorkbookRepository {
    async fn create(&self, workbook: Workbook) -> AppResult<Workbook> {
        self.workbooks.insert_one(&workbook).await?;
        Ok(workbook)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Workbook>> {
        let workbook = self.workbooks.find_one(doc! { "id": id }).await?;
        Ok(workbook)
    }

    async fn add_problem(&self, entry: WorkbookProblem) -> AppResult<WorkbookProblem> {
        self.workbook_problems.insert_one(&entry).await?;
        Ok(entry)
    }

    async fn find_problems(&self, workbook_id: &str) -> AppResult<Vec<WorkbookProblem>> {
        let entries = self
            .workbook_problems
            .find(doc! { "workbook_id": workbook_id })
            .sort(doc! { "order_index": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(entries)
    }

    async fn update_order(&self, entries: Vec<WorkbookProblem>) -> AppResult<()> {
        // one statement per entry, no transaction
        for entry in &entries {
            self.workbook_problems
                .update_one(
                    doc! { "id": entry.id.as_str() },
                    doc! { "$set": { "order_index": entry.order_index } },
                )
                .await?;
        }
        Ok(())
    }
}
