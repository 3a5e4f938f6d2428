use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::convert::Infallible;

use crate::models::{Item, ItemResponse};

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

/// Scheme and host the client used to reach the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    pub fn from_parts(parts: &Parts) -> Self {
        let scheme = first_header_value(&parts.headers, FORWARDED_PROTO)
            .or_else(|| parts.uri.scheme_str().map(str::to_string))
            .unwrap_or_else(|| "http".to_string());

        let host = first_header_value(&parts.headers, FORWARDED_HOST)
            .or_else(|| first_header_value(&parts.headers, header::HOST.as_str()))
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());

        Self { scheme, host }
    }

    /// Absolute URL of an item's photo
    pub fn photo_url(&self, id: i64) -> String {
        format!("{}://{}/inventory/{}/photo", self.scheme, self.host, id)
    }

    /// Project a stored item into its public shape
    pub fn project(&self, item: Item) -> ItemResponse {
        let photo_url = item
            .photo_filename
            .as_ref()
            .map(|_| self.photo_url(item.id));

        ItemResponse {
            id: item.id.to_string(),
            name: item.name,
            description: item.description,
            photo_url,
        }
    }
}

// Proxies may send a comma-separated chain; the first entry is the client-facing one.
fn first_header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}
