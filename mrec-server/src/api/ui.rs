//! Landing page and recorder script, embedded at compile time

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");
const SCRIPT_JS: &str = include_str!("../../static/script.js");

/// GET /
pub async fn index_page() -> Html<String> {
    Html(INDEX_HTML.replace(
        "{{BUILD_INFO}}",
        &format!(
            "v{} [{}] built {}",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_HASH"),
            env!("BUILD_TIMESTAMP")
        ),
    ))
}

/// GET /static/script.js
pub async fn serve_script_js() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "application/javascript"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        SCRIPT_JS,
    )
        .into_response()
}

pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_page))
        .route("/static/script.js", get(serve_script_js))
}
