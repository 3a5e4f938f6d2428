use axum::{
    body::{Body, Bytes},
    extract::{
        multipart::MultipartRejection, rejection::FormRejection, Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use std::collections::HashMap;

use crate::error::{ApiResponse, AppError, Result};
use crate::models::{ItemResponse, RequestOrigin, SearchRequest};
use crate::services::inventory::discard_photo;
use crate::services::InventoryService;
use crate::storage::LocalStorage;
use crate::AppState;

const PHOTO_FIELD: &str = "photo";

/// Text fields and the saved photo of a multipart upload
#[derive(Debug, Default)]
struct UploadForm {
    text: HashMap<String, String>,
    photo: Option<String>,
}

impl UploadForm {
    fn take_text(&mut self, name: &str) -> Option<String> {
        self.text.remove(name)
    }
}

/// Read a multipart body, streaming the `photo` part into photo storage.
/// A photo saved before a later failure is discarded again.
async fn read_upload(photos: &LocalStorage, mut multipart: Multipart) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    if let Err(e) = collect_fields(photos, &mut multipart, &mut form).await {
        if let Some(filename) = &form.photo {
            discard_photo(photos, filename).await;
        }
        return Err(e);
    }

    Ok(form)
}

async fn collect_fields(
    photos: &LocalStorage,
    multipart: &mut Multipart,
    form: &mut UploadForm,
) -> Result<()> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to process multipart: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == PHOTO_FIELD {
            // Browsers send an unnamed part when no file was chosen
            if field.file_name().map_or(true, str::is_empty) {
                continue;
            }
            if form.photo.is_some() {
                return Err(AppError::BadRequest(
                    "Only one photo may be uploaded".to_string(),
                ));
            }
            form.photo = Some(photos.save(field).await?);
        } else {
            let text = field.text().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read field {}: {}", name, e))
            })?;
            form.text.insert(name, text);
        }
    }

    Ok(())
}

/// Register a new item
/// POST /register
pub async fn register_item(
    State(state): State<AppState>,
    origin: RequestOrigin,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ItemResponse>)> {
    let mut form = read_upload(&state.photos, multipart?).await?;

    let item = InventoryService::register(
        state.items.as_ref(),
        &state.photos,
        &origin,
        form.take_text("inventory_name"),
        form.take_text("description"),
        form.photo,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// List all items
/// GET /inventory
pub async fn list_items(
    State(state): State<AppState>,
    origin: RequestOrigin,
) -> Result<Json<Vec<ItemResponse>>> {
    let items = InventoryService::list(state.items.as_ref(), &origin).await?;
    Ok(Json(items))
}

/// Get a specific item
/// GET /inventory/:id
pub async fn get_item(
    State(state): State<AppState>,
    origin: RequestOrigin,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>> {
    let item = InventoryService::get(state.items.as_ref(), &origin, &id).await?;
    Ok(Json(item))
}

/// Update name and/or description
/// PUT /inventory/:id
pub async fn update_item(
    State(state): State<AppState>,
    origin: RequestOrigin,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ItemResponse>> {
    let item = InventoryService::update(state.items.as_ref(), &origin, &id, &body).await?;
    Ok(Json(item))
}

/// Download an item's photo
/// GET /inventory/:id/photo
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let data = InventoryService::photo(state.items.as_ref(), &state.photos, &id).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/jpeg")
        .header(header::CONTENT_LENGTH, data.len())
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// Replace an item's photo
/// PUT /inventory/:id/photo
pub async fn replace_photo(
    State(state): State<AppState>,
    origin: RequestOrigin,
    Path(id): Path<String>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ItemResponse>> {
    let id = state.items.backend().parse_id(&id)?;
    state.items.get(id).await?;

    let form = read_upload(&state.photos, multipart?).await?;
    let item = InventoryService::replace_photo(
        state.items.as_ref(),
        &state.photos,
        &origin,
        id,
        form.photo,
    )
    .await?;

    Ok(Json(item))
}

/// Delete an item
/// DELETE /inventory/:id
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    InventoryService::delete(state.items.as_ref(), &id).await?;
    Ok(Json(ApiResponse::<()>::success_message("Item deleted")))
}

/// Look an item up from the search form
/// POST /search
pub async fn search_item(
    State(state): State<AppState>,
    origin: RequestOrigin,
    form: std::result::Result<Form<SearchRequest>, FormRejection>,
) -> Result<Json<ItemResponse>> {
    let Form(req) = form?;

    let item = InventoryService::search(
        state.items.as_ref(),
        &origin,
        req.id.as_deref(),
        req.wants_photo(),
    )
    .await?;

    Ok(Json(item))
}
