use bytes::Bytes;

use crate::error::{AppError, Result};
use crate::models::{ItemPatch, ItemResponse, NewItem, RequestOrigin};
use crate::store::{parse_item_id, ItemStore, StoreBackend};
use crate::storage::LocalStorage;

/// Inventory operations shared by the HTTP handlers
pub struct InventoryService;

impl InventoryService {
    /// Register a new item; the name must be present and non-blank
    pub async fn register(
        items: &dyn ItemStore,
        photos: &LocalStorage,
        origin: &RequestOrigin,
        name: Option<String>,
        description: Option<String>,
        photo_filename: Option<String>,
    ) -> Result<ItemResponse> {
        let name = match name.filter(|n| !n.trim().is_empty()) {
            Some(name) => name,
            None => {
                if let Some(filename) = &photo_filename {
                    discard_photo(photos, filename).await;
                }
                return Err(AppError::BadRequest("inventory_name is required".to_string()));
            }
        };

        let item = items
            .create(NewItem {
                name,
                description: description.unwrap_or_default(),
                photo_filename,
            })
            .await?;

        tracing::info!("Registered item {}", item.id);
        Ok(origin.project(item))
    }

    pub async fn list(items: &dyn ItemStore, origin: &RequestOrigin) -> Result<Vec<ItemResponse>> {
        let list = items.list().await?;
        Ok(list.into_iter().map(|item| origin.project(item)).collect())
    }

    pub async fn get(
        items: &dyn ItemStore,
        origin: &RequestOrigin,
        raw_id: &str,
    ) -> Result<ItemResponse> {
        let id = items.backend().parse_id(raw_id)?;
        let item = items.get(id).await?;
        Ok(origin.project(item))
    }

    /// Apply a JSON update body to an existing item.
    ///
    /// Existence is checked before the body is decoded, so an unknown id is
    /// always a 404 whatever the body holds.
    pub async fn update(
        items: &dyn ItemStore,
        origin: &RequestOrigin,
        raw_id: &str,
        body: &[u8],
    ) -> Result<ItemResponse> {
        let id = items.backend().parse_id(raw_id)?;
        items.get(id).await?;

        let patch = decode_patch(body)?;
        let item = items.update(id, patch).await?;
        Ok(origin.project(item))
    }

    /// Load the photo bytes of an item
    pub async fn photo(items: &dyn ItemStore, photos: &LocalStorage, raw_id: &str) -> Result<Bytes> {
        let id = items.backend().parse_id(raw_id)?;
        let item = items.get(id).await?;
        let filename = item
            .photo_filename
            .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;

        photos.get(&filename).await
    }

    /// Point an item at a newly saved photo.
    ///
    /// Without a photo the database backend rejects the request and the memory
    /// backend returns the item unchanged. The previous file is left in place.
    pub async fn replace_photo(
        items: &dyn ItemStore,
        photos: &LocalStorage,
        origin: &RequestOrigin,
        id: i64,
        photo_filename: Option<String>,
    ) -> Result<ItemResponse> {
        let Some(filename) = photo_filename else {
            return match items.backend() {
                StoreBackend::Database => {
                    Err(AppError::BadRequest("photo is required".to_string()))
                }
                StoreBackend::Memory => Ok(origin.project(items.get(id).await?)),
            };
        };

        match items.update_photo(id, filename.clone()).await {
            Ok(item) => Ok(origin.project(item)),
            Err(e) => {
                discard_photo(photos, &filename).await;
                Err(e)
            }
        }
    }

    pub async fn delete(items: &dyn ItemStore, raw_id: &str) -> Result<()> {
        let id = items.backend().parse_id(raw_id)?;
        items.delete(id).await?;
        tracing::info!("Deleted item {}", id);
        Ok(())
    }

    /// Look an item up by id, optionally appending its photo link to the description.
    ///
    /// A malformed id is a 400 on every backend.
    pub async fn search(
        items: &dyn ItemStore,
        origin: &RequestOrigin,
        raw_id: Option<&str>,
        with_photo: bool,
    ) -> Result<ItemResponse> {
        let raw_id = raw_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("id is required".to_string()))?;

        let id = parse_item_id(raw_id)?;
        let item = items.get(id).await?;
        let has_photo = item.photo_filename.is_some();

        let mut response = origin.project(item);
        if with_photo && has_photo {
            response.description = format!("{} Photo: {}", response.description, origin.photo_url(id));
        }

        Ok(response)
    }
}

fn decode_patch(body: &[u8]) -> Result<ItemPatch> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ItemPatch::default());
    }

    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(AppError::BadRequest("Update body must be a JSON object".to_string()));
    }

    let request: crate::models::UpdateItemRequest = serde_json::from_value(value)?;
    request.into_patch().map_err(AppError::BadRequest)
}

pub(crate) async fn discard_photo(photos: &LocalStorage, filename: &str) {
    if let Err(e) = photos.delete(filename).await {
        tracing::error!("Failed to discard photo {}: {}", filename, e);
    }
}
