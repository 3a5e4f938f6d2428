pub mod database;
pub mod memory;

pub use database::*;
pub use memory::*;

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, Result};
use crate::models::{Item, ItemPatch, NewItem};

/// Which item store implementation is serving requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Database,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Database => "database",
        }
    }

    /// Parse an externally supplied item id.
    ///
    /// The memory backend treats anything that is not a positive integer as a
    /// key that simply does not exist; the database backend rejects it.
    pub fn parse_id(&self, raw: &str) -> Result<i64> {
        match self {
            StoreBackend::Memory => parse_item_id(raw).map_err(|_| item_not_found()),
            StoreBackend::Database => parse_item_id(raw),
        }
    }
}

/// Parse a positive integer id, rejecting anything else as a bad request
pub fn parse_item_id(raw: &str) -> Result<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest(format!("Invalid item id: {}", raw))),
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "database" => Ok(StoreBackend::Database),
            other => Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        }
    }
}

pub(crate) fn item_not_found() -> AppError {
    AppError::NotFound("Item not found".to_string())
}

/// Item store trait
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert a new item and assign it the next id
    async fn create(&self, item: NewItem) -> Result<Item>;

    async fn get(&self, id: i64) -> Result<Item>;

    /// All items ordered by ascending id
    async fn list(&self) -> Result<Vec<Item>>;

    /// Overwrite the fields present in `patch`
    async fn update(&self, id: i64, patch: ItemPatch) -> Result<Item>;

    async fn update_photo(&self, id: i64, photo_filename: String) -> Result<Item>;

    async fn delete(&self, id: i64) -> Result<()>;

    fn backend(&self) -> StoreBackend;
}
