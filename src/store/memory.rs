use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::{Item, ItemPatch, NewItem};
use crate::store::{item_not_found, ItemStore, StoreBackend};

struct Inventory {
    next_id: i64,
    items: BTreeMap<i64, Item>,
}

/// Process-local item store.
///
/// Every operation holds the lock for its whole duration, so each call is
/// atomic with respect to the others. Ids start at 1 and are never reused.
pub struct MemoryItemStore {
    inner: Mutex<Inventory>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inventory {
                next_id: 1,
                items: BTreeMap::new(),
            }),
        }
    }
}

impl Default for MemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn create(&self, item: NewItem) -> Result<Item> {
        let mut inventory = self.inner.lock().await;
        let id = inventory.next_id;
        inventory.next_id += 1;

        let item = Item {
            id,
            name: item.name,
            description: item.description,
            photo_filename: item.photo_filename,
        };
        inventory.items.insert(id, item.clone());

        Ok(item)
    }

    async fn get(&self, id: i64) -> Result<Item> {
        self.inner
            .lock()
            .await
            .items
            .get(&id)
            .cloned()
            .ok_or_else(item_not_found)
    }

    async fn list(&self) -> Result<Vec<Item>> {
        Ok(self.inner.lock().await.items.values().cloned().collect())
    }

    async fn update(&self, id: i64, patch: ItemPatch) -> Result<Item> {
        let mut inventory = self.inner.lock().await;
        let item = inventory.items.get_mut(&id).ok_or_else(item_not_found)?;

        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(description) = patch.description {
            item.description = description;
        }

        Ok(item.clone())
    }

    async fn update_photo(&self, id: i64, photo_filename: String) -> Result<Item> {
        let mut inventory = self.inner.lock().await;
        let item = inventory.items.get_mut(&id).ok_or_else(item_not_found)?;
        item.photo_filename = Some(photo_filename);
        Ok(item.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.inner
            .lock()
            .await
            .items
            .remove(&id)
            .map(|_| ())
            .ok_or_else(item_not_found)
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Memory
    }
}
