pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::intake::handlers as intake;
use crate::state::AppState;
use crate::viewer::handlers as viewer;
use crate::workspace::handlers as workspace;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/health", get(health::health_handler))
        // Workspace / project store
        .route("/api/v1/workspace", get(workspace::handle_get_workspace))
        .route("/api/v1/workspace/new", post(workspace::handle_new_project))
        .route(
            "/api/v1/projects",
            get(workspace::handle_list_projects).post(generation::handle_create_project),
        )
        .route(
            "/api/v1/projects/:id/select",
            post(workspace::handle_select_project),
        )
        // Document intake
        .route(
            "/api/v1/intake/reference",
            post(intake::handle_upload_reference),
        )
        .route("/api/v1/intake/sources", post(intake::handle_upload_sources))
        // Viewer
        .route("/api/v1/projects/:id/view", get(viewer::handle_view_project))
        .route("/api/v1/projects/:id/raw", get(viewer::handle_raw_file))
        .route(
            "/api/v1/projects/:id/export",
            get(viewer::handle_export_project),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::generation::generator::tests::{main_tex, FakeGenerator};
    use crate::intake::docx::tests::docx_with_paragraphs;
    use crate::llm_client::{ContentPart, LlmError};
    use crate::models::project::GeneratedFile;
    use crate::workspace::Workspace;

    const BOUNDARY: &str = "latex-architect-test-boundary";

    fn test_config() -> Config {
        Config {
            gemini_api_key: "test-key".to_string(),
            gemini_api_url: "http://127.0.0.1:9".to_string(),
            port: 0,
            max_upload_mb: 5,
            rust_log: "debug".to_string(),
        }
    }

    fn app(generator: Arc<FakeGenerator>) -> Router {
        build_router(AppState {
            workspace: Arc::new(Workspace::new()),
            generator,
            config: test_config(),
        })
    }

    fn multipart(uri: &str, files: &[(&str, &str, Vec<u8>)]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, content_type, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn fetch(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    const DOCX_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

    async fn upload_reference(app: &Router) {
        let response = app
            .clone()
            .oneshot(multipart(
                "/api/v1/intake/reference",
                &[("style.docx", DOCX_TYPE, docx_with_paragraphs(&["Chapter guide..."]))],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    async fn upload_sources(app: &Router) {
        let response = app
            .clone()
            .oneshot(multipart(
                "/api/v1/intake/sources",
                &[
                    ("draft1.docx", DOCX_TYPE, docx_with_paragraphs(&["First draft"])),
                    ("draft2.pdf", "application/pdf", b"%PDF-1.4".to_vec()),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    async fn submit(app: &Router, name: &str) -> Response {
        app.clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/projects",
                json!({
                    "name": name,
                    "category": "book",
                    "language": "en",
                    "instructions": "split by heading"
                }),
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(Arc::new(FakeGenerator::replying(vec![])));
        let response = app.oneshot(fetch("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_full_project_creation_scenario() {
        let intro = GeneratedFile {
            name: "intro.tex".into(),
            path: "chapters/intro.tex".into(),
            content: "\\chapter{Intro}".into(),
        };
        let generator = Arc::new(FakeGenerator::replying(vec![main_tex(), intro]));
        let app = app(generator.clone());

        upload_reference(&app).await;
        upload_sources(&app).await;

        let response = submit(&app, "My Book").await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let project = body_json(response).await;
        assert_eq!(project["category"], "book");
        assert_eq!(project["language"], "en");
        assert_eq!(project["files"].as_array().unwrap().len(), 2);
        let id = project["id"].as_str().unwrap().to_string();

        // One call, four parts: instructions, reference text, draft1 text, draft2 binary.
        assert_eq!(generator.call_count(), 1);
        let parts = generator.calls.lock().unwrap()[0].clone();
        assert_eq!(parts.len(), 4);
        let ContentPart::Text { text: instructions } = &parts[0] else {
            panic!("first part must be the instruction block");
        };
        assert!(instructions.contains("split by heading"));
        assert_eq!(
            parts[1],
            ContentPart::text(
                "--- REFERENCE DOCUMENT CONTENT (style.docx) ---\nChapter guide...\n\n"
            )
        );
        assert!(matches!(&parts[2], ContentPart::Text { text } if text.contains("First draft")));
        assert_eq!(
            parts[3],
            ContentPart::inline_data("application/pdf", "JVBERi0xLjQ=")
        );

        // Auto-selected, draft cleared.
        let workspace = body_json(app.clone().oneshot(fetch("/api/v1/workspace")).await.unwrap()).await;
        assert_eq!(workspace["selected_project_id"], id.as_str());
        assert_eq!(workspace["generating"], false);
        assert_eq!(workspace["draft"]["is_empty"], true);

        // Viewer starts on the first file.
        let view = body_json(
            app.clone()
                .oneshot(fetch(&format!("/api/v1/projects/{id}/view")))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(view["active_file"]["path"], "main.tex");
        assert_eq!(view["language_name"], "English");
        assert_eq!(view["files"][0]["active"], true);
        assert_eq!(view["files"][1]["is_tex"], true);

        // Switching the active file.
        let switched = body_json(
            app.clone()
                .oneshot(fetch(&format!(
                    "/api/v1/projects/{id}/view?file=chapters/intro.tex"
                )))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(switched["active_file"]["name"], "intro.tex");
        assert_eq!(switched["files"][0]["active"], false);

        // Raw copy of the active file.
        let raw = app
            .clone()
            .oneshot(fetch(&format!(
                "/api/v1/projects/{id}/raw?file=chapters/intro.tex"
            )))
            .await
            .unwrap();
        assert_eq!(raw.status(), StatusCode::OK);
        assert_eq!(body_text(raw).await, "\\chapter{Intro}");

        // Export.
        let export = app
            .clone()
            .oneshot(fetch(&format!("/api/v1/projects/{id}/export")))
            .await
            .unwrap();
        assert_eq!(export.status(), StatusCode::OK);
        assert_eq!(
            export.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"My_Book_latex_project.json\""
        );
        let exported: Vec<GeneratedFile> =
            serde_json::from_str(&body_text(export).await).unwrap();
        assert_eq!(exported.len(), 2);
        assert_eq!(exported[0].path, "main.tex");
    }

    #[tokio::test]
    async fn test_submission_without_uploads_is_rejected() {
        let generator = Arc::new(FakeGenerator::replying(vec![main_tex()]));
        let app = app(generator.clone());

        let response = submit(&app, "Thesis").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_is_generic_and_stores_nothing() {
        let generator = Arc::new(FakeGenerator::failing(LlmError::Api {
            status: 403,
            message: "API key not valid".into(),
        }));
        let app = app(generator.clone());
        upload_reference(&app).await;
        upload_sources(&app).await;

        let response = submit(&app, "Thesis").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "GENERATION_ERROR");
        assert!(!body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("API key"));

        let workspace = body_json(app.clone().oneshot(fetch("/api/v1/workspace")).await.unwrap()).await;
        assert_eq!(workspace["projects"].as_array().unwrap().len(), 0);
        assert_eq!(workspace["generating"], false);
        assert!(workspace["last_error"].is_string());
        assert_eq!(workspace["draft"]["sources"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_intake_failure_keeps_earlier_sources() {
        let app = app(Arc::new(FakeGenerator::replying(vec![])));
        upload_sources(&app).await;

        let response = app
            .clone()
            .oneshot(multipart(
                "/api/v1/intake/sources",
                &[
                    ("draft3.docx", DOCX_TYPE, docx_with_paragraphs(&["fine"])),
                    ("broken.docx", DOCX_TYPE, b"not a zip".to_vec()),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "INTAKE_ERROR");

        let workspace = body_json(app.clone().oneshot(fetch("/api/v1/workspace")).await.unwrap()).await;
        assert_eq!(
            workspace["draft"]["sources"],
            json!(["draft1.docx", "draft2.pdf"])
        );
    }

    #[tokio::test]
    async fn test_reference_must_be_docx() {
        let app = app(Arc::new(FakeGenerator::replying(vec![])));
        let response = app
            .clone()
            .oneshot(multipart(
                "/api/v1/intake/reference",
                &[("style.pdf", "application/pdf", b"%PDF-1.4".to_vec())],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_projects_are_listed_most_recent_first() {
        let app = app(Arc::new(FakeGenerator::replying(vec![main_tex()])));

        upload_reference(&app).await;
        upload_sources(&app).await;
        let p1 = body_json(submit(&app, "P1").await).await;

        upload_reference(&app).await;
        upload_sources(&app).await;
        let p2 = body_json(submit(&app, "P2").await).await;

        let list = body_json(app.clone().oneshot(fetch("/api/v1/projects")).await.unwrap()).await;
        let ids: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, [p2["id"].as_str().unwrap(), p1["id"].as_str().unwrap()]);

        // Select the older one, then go back to the form.
        let p1_id = p1["id"].as_str().unwrap();
        let selected = body_json(
            app.clone()
                .oneshot(json_request(
                    Method::POST,
                    &format!("/api/v1/projects/{p1_id}/select"),
                    json!({}),
                ))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(selected["selected_project_id"], p1_id);

        let fresh = body_json(
            app.clone()
                .oneshot(json_request(Method::POST, "/api/v1/workspace/new", json!({})))
                .await
                .unwrap(),
        )
        .await;
        assert!(fresh["selected_project_id"].is_null());
        assert_eq!(fresh["projects"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_project_exports_and_has_no_raw_file() {
        let app = app(Arc::new(FakeGenerator::replying(vec![])));
        upload_reference(&app).await;
        upload_sources(&app).await;
        let project = body_json(submit(&app, "Empty  Reply").await).await;
        let id = project["id"].as_str().unwrap();

        let export = app
            .clone()
            .oneshot(fetch(&format!("/api/v1/projects/{id}/export")))
            .await
            .unwrap();
        assert_eq!(
            export.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Empty_Reply_latex_project.json\""
        );
        assert_eq!(body_text(export).await, "[]");

        let raw = app
            .clone()
            .oneshot(fetch(&format!("/api/v1/projects/{id}/raw")))
            .await
            .unwrap();
        assert_eq!(raw.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_project_is_not_found() {
        let app = app(Arc::new(FakeGenerator::replying(vec![])));
        let id = uuid::Uuid::new_v4();
        let response = app
            .oneshot(fetch(&format!("/api/v1/projects/{id}/view")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
