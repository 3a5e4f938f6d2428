use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;

/// Methods the service answers at all; anything else is 405 on every path
const RECOGNIZED_METHODS: [Method; 5] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::DELETE,
];

/// Reject unrecognized methods before routing
pub async fn reject_unknown_methods(request: Request, next: Next) -> Result<Response, AppError> {
    if !RECOGNIZED_METHODS.contains(request.method()) {
        tracing::debug!("Rejected {} {}", request.method(), request.uri());
        return Err(AppError::MethodNotAllowed);
    }

    Ok(next.run(request).await)
}
