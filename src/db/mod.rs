//! Data access for users and messages. Every operation is a single
//! statement against the pool, so each one commits on its own.

mod messages;
mod users;

use std::str::FromStr;

use serde::Deserialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

use crate::include_res;

pub const MAX_PAGE: i64 = 100;

#[derive(Clone, Debug)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    pub async fn connect(url: &str) -> sqlx::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(16)
            .connect_with(options)
            .await?;

        let db = Db { pool };
        db.init_schema().await?;
        info!("database ready at {url}");
        Ok(db)
    }

    /// A private in-memory database. The pool holds a single connection that
    /// never expires, since closing it would drop the data.
    pub async fn in_memory() -> sqlx::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Db { pool };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> sqlx::Result<()> {
        sqlx::raw_sql(include_res!(str, "/schema.sql"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    MAX_PAGE
}

impl Default for Page {
    fn default() -> Self {
        Page { skip: 0, limit: MAX_PAGE }
    }
}

impl Page {
    pub(crate) fn offset(&self) -> i64 {
        self.skip.max(0)
    }

    pub(crate) fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE)
    }
}
