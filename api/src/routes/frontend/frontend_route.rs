//! Bundled single-page search UI.

use axum::{
    http::{HeaderValue, header::CONTENT_TYPE},
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../../../static/index.html");
const APP_JS: &str = include_str!("../../../static/app.js");

/// Handler: GET /
pub async fn index_route() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Handler: GET /static/app.js
pub async fn app_js_route() -> Response {
    let mut res = APP_JS.into_response();
    res.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/javascript; charset=utf-8"),
    );
    res
}
