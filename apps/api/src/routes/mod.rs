pub mod download;
pub mod health;
pub mod process;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/process_resume", post(process::handle_process_resume))
        .route("/api/download/*path", get(download::handle_download))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::{Completion, LlmError, TextGenerator};
    use crate::pipeline::Pipeline;

    /// Deterministic stand-in for the LLM: tags each response with a prefix
    /// derived from the prompt so assertions can trace which step produced
    /// which value.
    struct TaggedEcho;

    #[async_trait]
    impl TextGenerator for TaggedEcho {
        async fn generate(&self, prompt: &str) -> Result<Completion, LlmError> {
            let tag = if prompt.starts_with("analyze this resume") {
                "SUMMARY:"
            } else if prompt.starts_with("match resume with job") {
                "MATCH:"
            } else {
                "TEXT:"
            };
            Ok(Completion::Text(format!("{tag}{prompt}")))
        }
    }

    fn test_state(artifacts_dir: PathBuf) -> AppState {
        AppState {
            pipeline: Arc::new(Pipeline::new(Arc::new(TaggedEcho)).unwrap()),
            config: Config {
                openai_api_key: "test-key".to_string(),
                openai_base_url: "http://localhost:0".to_string(),
                artifacts_dir,
                port: 0,
                rust_log: "info".to_string(),
            },
        }
    }

    /// Values are raw bytes so tests can post payloads that are not UTF-8.
    fn multipart_body(boundary: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, value) in parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            let disposition = match filename {
                Some(filename) => format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\r\n"
                ),
                None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(value);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        body
    }

    fn process_request(boundary: &str, body: Vec<u8>) -> Request<Body> {
        Request::post("/api/process_resume")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path().to_path_buf()));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resumatch-api");
    }

    #[tokio::test]
    async fn test_process_resume_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path().to_path_buf()));

        let boundary = "resumatch-test-boundary";
        let body = multipart_body(
            boundary,
            &[
                (
                    "resume_file",
                    Some("resume.txt"),
                    b"Experienced backend engineer...",
                ),
                (
                    "job_desc_file",
                    Some("jd.txt"),
                    b"Seeking a backend engineer with Go experience",
                ),
                ("job_title", None, b"Backend Engineer"),
            ],
        );

        let response = app
            .clone()
            .oneshot(process_request(boundary, body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;

        assert_eq!(json["message"], "Processing complete");
        let summary = json["analysis"]["resume_summary"].as_str().unwrap();
        assert!(summary.starts_with("SUMMARY:"), "got: {summary}");
        let job_match = json["analysis"]["job_match"].as_str().unwrap();
        assert!(job_match.starts_with("MATCH:"), "got: {job_match}");

        // every advertised output must come back through the download route
        for key in ["cover_letter", "pitch", "resume_edits"] {
            let path = json["outputs"][key].as_str().unwrap();
            assert!(path.ends_with(&format!("{key}.pdf")), "odd path: {path}");

            let download = app
                .clone()
                .oneshot(
                    Request::get(format!("/api/download/{path}"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(download.status(), StatusCode::OK, "download of {key} failed");
            let pdf = axum::body::to_bytes(download.into_body(), usize::MAX)
                .await
                .unwrap();
            assert!(pdf.starts_with(b"%PDF"), "{key} is not a PDF");
        }
    }

    #[tokio::test]
    async fn test_process_resume_missing_part_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path().to_path_buf()));

        let boundary = "resumatch-test-boundary";
        let body = multipart_body(
            boundary,
            &[("resume_file", Some("resume.txt"), b"some resume text")],
        );

        let response = app.oneshot(process_request(boundary, body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(
            json["error"]["message"],
            "missing required input field 'job_description'"
        );
    }

    #[tokio::test]
    async fn test_process_resume_non_utf8_upload_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path().to_path_buf()));

        let boundary = "resumatch-test-boundary";
        let body = multipart_body(
            boundary,
            &[
                ("resume_file", Some("resume.txt"), b"\xff\xfe not text"),
                ("job_desc_file", Some("jd.txt"), b"Seeking a backend engineer"),
                ("job_title", None, b"Backend Engineer"),
            ],
        );

        let response = app.oneshot(process_request(boundary, body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "UPLOAD_ERROR");
        assert_eq!(
            json["error"]["message"],
            "part 'resume_file' is not valid UTF-8"
        );
    }

    // The remaining failure mode on this route is a PDF export error.
    // Permission bits cannot make the run directory unwritable when tests
    // run as root, so the export-to-500 mapping is exercised in errors.rs.

    #[tokio::test]
    async fn test_download_unknown_path_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(dir.path().to_path_buf()));

        let response = app
            .oneshot(
                Request::get("/api/download/run-nope/cover_letter.pdf")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["error"]["message"], "File not found");
    }

    #[tokio::test]
    async fn test_download_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let secret = dir.path().join("secret.txt");
        std::fs::write(&secret, b"outside the artifacts root").unwrap();
        let artifacts = dir.path().join("artifacts");
        std::fs::create_dir_all(&artifacts).unwrap();

        let app = build_router(test_state(artifacts));

        let response = app
            .oneshot(
                Request::get("/api/download/../secret.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
