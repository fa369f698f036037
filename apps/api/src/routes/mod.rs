pub mod health;
pub mod parse;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/parse", post(parse::handle_parse))
        // Upload page and its assets
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::document::docx::build_docx;
    use crate::models::Resume;
    use crate::parser::{ruleset::Ruleset, ResumeParser};

    const BOUNDARY: &str = "cv-parser-test-boundary";

    fn test_router(static_dir: &Path) -> Router {
        let config = Config {
            port: 0,
            rust_log: "info".to_string(),
            static_dir: static_dir.to_path_buf(),
            max_upload_bytes: 1024 * 1024,
            ruleset_path: None,
        };
        let parser = ResumeParser::new(&Ruleset::default()).unwrap();
        build_router(AppState {
            config,
            parser: Arc::new(parser),
        })
    }

    fn router() -> Router {
        test_router(&PathBuf::from("static"))
    }

    fn upload_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/parse")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "cv-parser");
    }

    #[tokio::test]
    async fn test_parse_docx_upload_returns_resume_json() {
        let docx = build_docx(&[
            "Jane Roe",
            "jane@example.com",
            "https://github.com/janeroe",
            "",
            "Education",
            "Bachelor of Computer Science",
            "Politeknik Negeri Jakarta",
            "2014 - 2018",
            "",
            "Experience",
            "2018 - 2022",
            "Data Analyst",
            "Globex Group",
            "- Built Python dashboards",
        ]);

        let response = router()
            .oneshot(upload_request("file", "Jane_Roe.DOCX", &docx))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let resume: Resume = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(resume.email, "jane@example.com");
        assert_eq!(resume.github, "https://github.com/janeroe");
        assert_eq!(resume.skills, vec!["Python"]);
        assert_eq!(resume.education.len(), 1);
        assert_eq!(resume.education[0].institution, "Politeknik Negeri Jakarta");
        assert_eq!(resume.experience.len(), 1);
        assert_eq!(resume.experience[0].company, "Globex Group");
        assert_eq!(resume.experience[0].details, vec!["Built Python dashboards"]);
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_rejected() {
        let response = router()
            .oneshot(upload_request("file", "resume.txt", b"Education\nBachelor"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FILE_TYPE");
    }

    #[tokio::test]
    async fn test_missing_file_field_is_rejected() {
        let response = router()
            .oneshot(upload_request("attachment", "resume.pdf", b"%PDF-1.4"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_undecodable_document_is_server_error() {
        let response = router()
            .oneshot(upload_request("file", "resume.docx", b"definitely not a zip"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "DECODE_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("File parse error:"));
    }

    #[tokio::test]
    async fn test_parse_rejects_get() {
        let response = router()
            .oneshot(Request::get("/parse").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_serves_index_and_static_assets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>upload</h1>").unwrap();
        std::fs::write(dir.path().join("app.css"), "body{}").unwrap();

        let response = test_router(dir.path())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"<h1>upload</h1>");

        let response = test_router(dir.path())
            .oneshot(Request::get("/static/app.css").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"body{}");
    }
}
