use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Inventory item as held by a store
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub photo_filename: Option<String>,
}

/// Values for a newly registered item
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub photo_filename: Option<String>,
}

/// Partial update; `None` leaves the stored value unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Externally visible item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub photo_url: Option<String>,
}

/// Update item request
/// PUT /inventory/:id
///
/// Each field is `None` when omitted and `Some(None)` when sent as `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateItemRequest {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateItemRequest {
    /// Validate the request and turn it into a store patch
    pub fn into_patch(self) -> Result<ItemPatch, String> {
        let name = match self.name {
            None => None,
            Some(None) => return Err("name cannot be null".to_string()),
            Some(Some(name)) if name.trim().is_empty() => {
                return Err("name cannot be empty".to_string())
            }
            Some(Some(name)) => Some(name),
        };

        // An explicit null clears the description
        let description = self.description.map(Option::unwrap_or_default);

        Ok(ItemPatch { name, description })
    }
}

/// Search form
/// POST /search
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub id: Option<String>,
    pub has_photo: Option<String>,
}

impl SearchRequest {
    /// Any non-blank value except `false`, `0`, `no` and `off` counts as set
    pub fn wants_photo(&self) -> bool {
        match self.has_photo.as_deref().map(str::trim) {
            None | Some("") => false,
            Some(value) => !matches!(
                value.to_ascii_lowercase().as_str(),
                "false" | "0" | "no" | "off"
            ),
        }
    }
}
