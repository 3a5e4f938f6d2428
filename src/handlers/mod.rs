pub mod docs;
pub mod inventory;

use crate::error::AppError;

/// Fallback for unknown paths and unregistered methods on known paths
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
