use axum::{
    http::{header, HeaderValue},
    response::{Html, IntoResponse},
};

static REGISTER_FORM: &str = include_str!("../static/RegisterForm.html");
static SEARCH_FORM: &str = include_str!("../static/SearchForm.html");

fn form_page(html: &'static str) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, HeaderValue::from_static("public, max-age=3600"))],
        Html(html),
    )
}

/// GET /RegisterForm.html
pub async fn register_form() -> impl IntoResponse {
    form_page(REGISTER_FORM)
}

/// GET /SearchForm.html
pub async fn search_form() -> impl IntoResponse {
    form_page(SEARCH_FORM)
}
