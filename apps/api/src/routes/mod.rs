pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::review::handlers;
use crate::state::AppState;

/// Uploads arrive as raw bytes or base64 inside JSON; both fit under this cap.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Review API
        .route("/api/v1/roles", get(handlers::handle_list_roles))
        .route(
            "/api/v1/documents/parse",
            post(handlers::handle_parse_document),
        )
        .route("/api/v1/reviews", post(handlers::handle_review))
        .route(
            "/api/v1/reviews/export/text",
            post(handlers::handle_export_text),
        )
        .route(
            "/api/v1/reviews/export/pdf",
            post(handlers::handle_export_pdf),
        )
        // Sessions (optional, needs SESSIONS_DIR)
        .route("/api/v1/sessions", post(handlers::handle_save_session))
        .route("/api/v1/sessions/:id", get(handlers::handle_load_session))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::export::{read_narrative, PageConfig};
    use crate::llm_client::OfflineProvider;

    const RESUME: &str = "Jane Doe\njane@example.com\n\nEXPERIENCE\n- Built billing APIs in Python\n\nSKILLS\nPython, SQL";

    fn app(config: Config) -> Router {
        build_router(AppState {
            config,
            llm: Arc::new(OfflineProvider),
            page_config: PageConfig::default(),
        })
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    async fn review_json(router: Router) -> Value {
        let response = router
            .oneshot(post_json(
                "/api/v1/reviews",
                &json!({
                    "resume_text": RESUME,
                    "job_description": "Python, SQL and AWS",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Config::default()).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["llm_provider"], "offline");
    }

    #[tokio::test]
    async fn test_roles_lists_templates() {
        let response = app(Config::default()).oneshot(get("/api/v1/roles")).await.unwrap();
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        let roles = body.as_array().unwrap();
        assert_eq!(roles.len(), 7);
        assert_eq!(roles[0]["id"], "software_engineer");
        assert!(!roles[0]["keywords"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_parse_document_plain_text() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/documents/parse")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("  SKILLS \r\n Rust,   SQL "))
            .unwrap();
        let response = app(Config::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["text"], "SKILLS\nRust, SQL");
        assert_eq!(body["words"], 3);
        assert_eq!(body["fingerprint"].as_str().unwrap().len(), 64);
    }

    #[tokio::test]
    async fn test_parse_document_invalid_utf8_is_422() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/documents/parse")
            .body(Body::from(vec![0xffu8, 0xfe, 0x00]))
            .unwrap();
        let response = app(Config::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_review_offline_is_rule_based() {
        let body = review_json(app(Config::default())).await;
        assert_eq!(body["narrative_source"], "rule_based");
        assert_eq!(body["match_percentage"], 67);
        assert_eq!(body["missing_keywords"], json!(["aws"]));
        assert!(body["improved_draft"].is_string());
    }

    #[tokio::test]
    async fn test_review_validation_error_shape() {
        let response = app(Config::default())
            .oneshot(post_json("/api/v1/reviews", &json!({"resume_text": "", "target_role": "Data Analyst"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_export_text_round_trips_narrative() {
        let review = review_json(app(Config::default())).await;
        let response = app(Config::default())
            .oneshot(post_json("/api/v1/reviews/export/text", &review))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        let text = String::from_utf8(body_bytes(response).await).unwrap();
        assert_eq!(
            read_narrative(&text).as_deref(),
            review["narrative"].as_str()
        );
    }

    #[tokio::test]
    async fn test_export_pdf() {
        let review = review_json(app(Config::default())).await;
        let response = app(Config::default())
            .oneshot(post_json("/api/v1/reviews/export/pdf", &review))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert!(body_bytes(response).await.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_sessions_disabled_without_dir() {
        let response = app(Config::default())
            .oneshot(get(&format!("/api/v1/sessions/{}", "a".repeat(64))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_session_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            sessions_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let review = review_json(app(config.clone())).await;

        let response = app(config.clone())
            .oneshot(post_json("/api/v1/sessions", &review))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let saved: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(saved["id"], review["id"]);

        let id = review["id"].as_str().unwrap();
        let response = app(config.clone())
            .oneshot(get(&format!("/api/v1/sessions/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let loaded: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(loaded["narrative"], review["narrative"]);

        let missing = "0".repeat(64);
        let response = app(config)
            .oneshot(get(&format!("/api/v1/sessions/{missing}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
