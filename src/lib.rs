pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod static_files;
pub mod storage;
pub mod store;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Database;
use crate::handlers::{docs, inventory, route_not_found};
use crate::storage::LocalStorage;
use crate::store::{ItemStore, MemoryItemStore, SqlItemStore, StoreBackend};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub items: Arc<dyn ItemStore>,
    pub photos: Arc<LocalStorage>,
}

impl AppState {
    pub fn new(items: Arc<dyn ItemStore>, photos: LocalStorage) -> Self {
        Self {
            items,
            photos: Arc::new(photos),
        }
    }

    /// Build the state for the configured store backend
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let items: Arc<dyn ItemStore> = match config.store.backend {
            StoreBackend::Memory => Arc::new(MemoryItemStore::new()),
            StoreBackend::Database => {
                let url = config.database.connection_url()?;
                let db = Database::new(&url, config.database.max_connections).await?;
                db.run_migrations().await?;
                tracing::info!("Database initialized");
                Arc::new(SqlItemStore::new(db))
            }
        };

        Ok(Self::new(items, LocalStorage::new(&config.storage.photo_path)))
    }
}

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/register",
            post(inventory::register_item)
                .fallback(route_not_found)
                // Photos are streamed to disk with no size cap
                .layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/inventory",
            get(inventory::list_items).fallback(route_not_found),
        )
        .route(
            "/inventory/:id",
            get(inventory::get_item)
                .put(inventory::update_item)
                .delete(inventory::delete_item)
                .fallback(route_not_found),
        )
        .route(
            "/inventory/:id/photo",
            get(inventory::get_photo)
                .put(inventory::replace_photo)
                .fallback(route_not_found)
                .layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/search",
            post(inventory::search_item).fallback(route_not_found),
        )
        .route(
            "/RegisterForm.html",
            get(static_files::register_form).fallback(route_not_found),
        )
        .route(
            "/SearchForm.html",
            get(static_files::search_form).fallback(route_not_found),
        )
        .route("/docs", get(docs::api_docs).fallback(route_not_found))
        .fallback(route_not_found)
        .layer(axum::middleware::from_fn(
            middleware::method::reject_unknown_methods,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
