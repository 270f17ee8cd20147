//! MongoDB connection shared by the campus repositories. Every collection
//! lives in the database named by `MONGO_DB_NAME`.

use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::time::Duration;

use crate::{config::Config, errors::AppResult};

/// Collection names, one per repository.
pub mod collections {
    pub const USERS: &str = "users";
    pub const PROBLEMS: &str = "problems";
    pub const WORKBOOKS: &str = "workbooks";
    pub const WORKBOOK_PROBLEMS: &str = "workbook_problems";
    pub const SOLUTION_RECORDS: &str = "solution_records";
    pub const REVIEW_SCHEDULES: &str = "review_schedules";
    pub const WORKBOOK_REVIEW_SCHEDULES: &str = "workbook_review_schedules";
    pub const DAILY_REVIEW_STATS: &str = "daily_review_stats";
    pub const REVIEW_REMINDERS: &str = "review_reminders";
}

#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&config.mongo_conn_string).await?;

        let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
        client_options.server_api = Some(server_api);
        client_options.max_pool_size = Some(10);
        client_options.min_pool_size = Some(2);
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        log::info!("Connected to MongoDB database {}", config.mongo_db_name);

        Ok(Self {
            client,
            db_name: config.mongo_db_name.clone(),
        })
    }

    pub fn get_collection<T>(&self, collection_name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client
            .database(&self.db_name)
            .collection(collection_name)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
