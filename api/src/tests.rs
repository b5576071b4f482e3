use std::{path::Path, sync::Arc};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use note_index::{SearchState, embedding::HashingEmbedder};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{AppState, middleware_layer::request_id::REQUEST_ID_HEADER, router};

const PDF_BYTES: &[u8] = b"%PDF-1.4\n%test\n";

fn notes_dir(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for f in files {
        std::fs::write(dir.path().join(f), PDF_BYTES).unwrap();
    }
    dir
}

async fn ready_app(dir: &Path) -> Router {
    let search = SearchState::with_provider(dir, "pdf", Arc::new(HashingEmbedder::new(4096))).await;
    assert!(search.is_available());
    router(Arc::new(AppState::new(search, dir)))
}

fn degraded_app(dir: &Path) -> Router {
    let search = SearchState::degraded("model files missing");
    router(Arc::new(AppState::new(search, dir)))
}

fn search_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(res: Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ready_index() {
    let dir = notes_dir(&["Linear_Algebra_Notes.pdf", "Organic_Chemistry.pdf"]);
    let app = ready_app(dir.path()).await;

    let res = app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = json_body(res).await;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["model_loaded"], json!(true));
    assert_eq!(body["model"], json!("hashing-4096"));
    assert_eq!(body["pdf_count"], json!(2));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn health_is_503_when_degraded() {
    let dir = notes_dir(&["A.pdf"]);
    let app = degraded_app(dir.path());

    let res = app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = json_body(res).await;
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["model_loaded"], json!(false));
    assert_eq!(body["pdf_count"], json!(0));
    assert_eq!(body["error"], json!("model files missing"));
}

#[tokio::test]
async fn search_returns_best_note_with_links() {
    let dir = notes_dir(&[
        "Linear_Algebra_Notes.pdf",
        "Organic_Chemistry.pdf",
        "World_History.pdf",
    ]);
    let app = ready_app(dir.path()).await;

    let res = app
        .oneshot(search_request(r#"{"query":"linear algebra"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = json_body(res).await;
    assert_eq!(body["name"], json!("Linear Algebra Notes"));
    assert_eq!(body["url"], json!("/pdf/Linear_Algebra_Notes.pdf"));
    assert_eq!(
        body["download_url"],
        json!("/download/Linear_Algebra_Notes.pdf")
    );
    assert!(body["score"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn blank_query_is_empty_query() {
    let dir = notes_dir(&["A.pdf"]);
    let app = ready_app(dir.path()).await;

    for payload in [r#"{"query":"   "}"#, "{}", r#"{"query":null}"#] {
        let res = app.clone().oneshot(search_request(payload)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(json_body(res).await["error"], json!("EMPTY_QUERY"));
    }
}

#[tokio::test]
async fn body_without_json_content_type_is_empty_query() {
    let dir = notes_dir(&["A.pdf"]);
    let app = ready_app(dir.path()).await;

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/search")
        .body(Body::from("query=a"))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["error"], json!("EMPTY_QUERY"));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let dir = notes_dir(&["A.pdf"]);
    let app = ready_app(dir.path()).await;

    let res = app.oneshot(search_request("{not json")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["error"], json!("BAD_REQUEST"));
}

#[tokio::test]
async fn empty_folder_is_no_documents() {
    let dir = notes_dir(&[]);
    let app = ready_app(dir.path()).await;

    let res = app
        .oneshot(search_request(r#"{"query":"anything"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["error"], json!("NO_DOCUMENTS"));
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn degraded_search_is_model_unavailable() {
    let dir = notes_dir(&["A.pdf"]);
    let app = degraded_app(dir.path());

    for payload in [r#"{"query":"a"}"#, r#"{"query":""}"#, "{broken"] {
        let res = app.clone().oneshot(search_request(payload)).await.unwrap();
        assert_eq!(
            res.status(),
            StatusCode::SERVICE_UNAVAILABLE,
            "payload {payload}"
        );
        assert_eq!(json_body(res).await["error"], json!("MODEL_UNAVAILABLE"));
    }
}

#[tokio::test]
async fn pdf_is_served_inline() {
    let dir = notes_dir(&["Linear_Algebra_Notes.pdf"]);
    let app = ready_app(dir.path()).await;

    let res = app
        .oneshot(get("/pdf/Linear_Algebra_Notes.pdf"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/pdf");
    assert!(res.headers().get(header::CONTENT_DISPOSITION).is_none());

    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], PDF_BYTES);
}

#[tokio::test]
async fn returned_urls_fetch_names_with_reserved_characters() {
    let dir = notes_dir(&["C#_Notes.pdf", "100%_Done?.pdf"]);
    let app = ready_app(dir.path()).await;

    for (query, expected) in [("c notes", "C#_Notes.pdf"), ("100 done", "100%_Done?.pdf")] {
        let res = app
            .clone()
            .oneshot(search_request(&json!({ "query": query }).to_string()))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(
            body["url"],
            json!(format!("/pdf/{}", urlencoding::encode(expected)))
        );

        for key in ["url", "download_url"] {
            let uri = body[key].as_str().unwrap();
            let res = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK, "{expected}: {key}={uri}");
            let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&bytes[..], PDF_BYTES);
        }
    }
}

#[tokio::test]
async fn large_note_is_served_whole() {
    let dir = notes_dir(&[]);
    let content: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    std::fs::write(dir.path().join("Big_Scan.pdf"), &content).unwrap();
    let app = ready_app(dir.path()).await;

    let res = app.oneshot(get("/download/Big_Scan.pdf")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_LENGTH], "200000");

    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(bytes.len(), content.len());
    assert!(bytes[..] == content[..]);
}

#[tokio::test]
async fn download_sets_attachment_disposition() {
    let dir = notes_dir(&["Linear_Algebra_Notes.pdf"]);
    let app = ready_app(dir.path()).await;

    let res = app
        .oneshot(get("/download/Linear_Algebra_Notes.pdf"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let disposition = res.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment;"));
    assert!(disposition.contains("Linear_Algebra_Notes.pdf"));
}

#[tokio::test]
async fn unknown_or_escaping_files_are_404() {
    let dir = notes_dir(&["A.pdf"]);
    std::fs::write(dir.path().join("secret.txt"), "x").unwrap();
    let app = ready_app(dir.path()).await;

    for uri in ["/pdf/missing.pdf", "/pdf/secret.txt", "/download/../A.pdf"] {
        let res = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "uri {uri}");
    }
}

#[tokio::test]
async fn degraded_service_serves_no_files() {
    let dir = notes_dir(&["A.pdf"]);
    let app = degraded_app(dir.path());

    let res = app.oneshot(get("/pdf/A.pdf")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_allow_any_origin() {
    let dir = notes_dir(&["A.pdf"]);
    let app = ready_app(dir.path()).await;

    let res = app.clone().oneshot(get("/healthz")).await.unwrap();
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/search")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(preflight).await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = res.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"));
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let dir = notes_dir(&["A.pdf"]);
    let app = ready_app(dir.path()).await;

    let req = Request::builder()
        .uri("/healthz")
        .header(REQUEST_ID_HEADER, "abc-123")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.headers()[REQUEST_ID_HEADER], "abc-123");

    let res = app.oneshot(get("/healthz")).await.unwrap();
    let generated = res.headers()[REQUEST_ID_HEADER].to_str().unwrap();
    assert!(generated.starts_with("req-"));
}

#[tokio::test]
async fn frontend_assets_are_served() {
    let dir = notes_dir(&[]);
    let app = degraded_app(dir.path());

    let res = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let ct = res.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(ct.starts_with("text/html"));
    let html = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert!(std::str::from_utf8(&html).unwrap().contains("/static/app.js"));

    let res = app.oneshot(get("/static/app.js")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()[header::CONTENT_TYPE],
        "application/javascript; charset=utf-8"
    );
}
