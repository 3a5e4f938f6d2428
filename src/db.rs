use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;

use crate::error::Result;

/// SQL dialect behind the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    fn from_url(url: &str) -> Self {
        if url.starts_with("sqlite:") {
            Dialect::Sqlite
        } else {
            Dialect::MySql
        }
    }
}

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
    dialect: Dialect,
}

impl Database {
    /// Create a new database connection
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(url)
            .await?;

        Ok(Self {
            pool,
            dialect: Dialect::from_url(url),
        })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        let ddl = match self.dialect {
            Dialect::MySql => {
                r#"
                CREATE TABLE IF NOT EXISTS items (
                    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                    name VARCHAR(255) NOT NULL,
                    description TEXT NOT NULL,
                    photo_filename VARCHAR(255) NULL
                )
                "#
            }
            Dialect::Sqlite => {
                r#"
                CREATE TABLE IF NOT EXISTS items (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    photo_filename TEXT
                )
                "#
            }
        };

        sqlx::query(ddl).execute(&self.pool).await?;

        tracing::info!("Database migrations completed");
        Ok(())
    }
}
