pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub use error::{Result, StorageError};
pub use repository::{InMemoryUserStore, PgUserStore, UserStore};

/// PostgreSQL connection pool plus the embedded schema migrations.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Store backed by this pool.
    pub fn user_store(&self) -> PgUserStore {
        PgUserStore::new(self.pool.clone())
    }
}
