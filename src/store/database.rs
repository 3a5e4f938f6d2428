use async_trait::async_trait;

use crate::db::{Database, Dialect};
use crate::error::Result;
use crate::models::{Item, ItemPatch, NewItem};
use crate::store::{item_not_found, ItemStore, StoreBackend};

/// Item store backed by the `items` table.
///
/// Updates run as separate read and write statements without a transaction.
pub struct SqlItemStore {
    db: Database,
}

impl SqlItemStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn find(&self, id: i64) -> Result<Option<Item>> {
        let item: Option<Item> = sqlx::query_as(
            "SELECT id, name, description, photo_filename FROM items WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(item)
    }
}

#[async_trait]
impl ItemStore for SqlItemStore {
    async fn create(&self, item: NewItem) -> Result<Item> {
        const INSERT: &str =
            "INSERT INTO items (name, description, photo_filename) VALUES (?, ?, ?)";

        // The Any driver reports no insert id for SQLite, so each dialect reads it back itself
        let id: i64 = match self.db.dialect() {
            Dialect::Sqlite => {
                sqlx::query_scalar(
                    "INSERT INTO items (name, description, photo_filename) VALUES (?, ?, ?) \
                     RETURNING id",
                )
                .bind(&item.name)
                .bind(&item.description)
                .bind(&item.photo_filename)
                .fetch_one(self.db.pool())
                .await?
            }
            Dialect::MySql => {
                // LAST_INSERT_ID is per connection
                let mut conn = self.db.pool().acquire().await?;
                sqlx::query(INSERT)
                    .bind(&item.name)
                    .bind(&item.description)
                    .bind(&item.photo_filename)
                    .execute(&mut *conn)
                    .await?;
                sqlx::query_scalar("SELECT CAST(LAST_INSERT_ID() AS SIGNED)")
                    .fetch_one(&mut *conn)
                    .await?
            }
        };

        Ok(Item {
            id,
            name: item.name,
            description: item.description,
            photo_filename: item.photo_filename,
        })
    }

    async fn get(&self, id: i64) -> Result<Item> {
        self.find(id).await?.ok_or_else(item_not_found)
    }

    async fn list(&self) -> Result<Vec<Item>> {
        let items: Vec<Item> = sqlx::query_as(
            "SELECT id, name, description, photo_filename FROM items ORDER BY id ASC",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(items)
    }

    async fn update(&self, id: i64, patch: ItemPatch) -> Result<Item> {
        let mut item = self.get(id).await?;

        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(description) = patch.description {
            item.description = description;
        }

        sqlx::query("UPDATE items SET name = ?, description = ? WHERE id = ?")
            .bind(&item.name)
            .bind(&item.description)
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(item)
    }

    async fn update_photo(&self, id: i64, photo_filename: String) -> Result<Item> {
        let mut item = self.get(id).await?;

        sqlx::query("UPDATE items SET photo_filename = ? WHERE id = ?")
            .bind(&photo_filename)
            .bind(id)
            .execute(self.db.pool())
            .await?;

        item.photo_filename = Some(photo_filename);
        Ok(item)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(item_not_found());
        }

        Ok(())
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Database
    }
}
