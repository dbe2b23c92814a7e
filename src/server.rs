//! HTTP front end: the single-page triage UI and its JSON API.
//!
//! Routes:
//! - `GET /` - the triage page
//! - `GET /health` - liveness and model name
//! - `POST /api/classify` - `{"abstract": "..."}` to `{"label", "reason", "known_label"}`

use crate::classifier::{ClassificationRequest, Classifier};
use crate::prompts::EXAMPLE_ABSTRACT;
use askama::Template;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Triage page, prefilled with the example abstract.
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    example_abstract: &'a str,
}

/// Shared handler state. The classifier holds no mutable state, so concurrent
/// requests proceed independently.
#[derive(Clone)]
struct AppState {
    classifier: Arc<Classifier>,
    index_html: Arc<str>,
}

/// Classify request body
#[derive(Debug, Deserialize)]
struct ClassifyBody {
    #[serde(rename = "abstract")]
    abstract_text: String,
}

/// Classify response
#[derive(Debug, Serialize)]
struct ClassifyResponse {
    label: String,
    reason: String,
    /// Whether `label` is one of the five fixed labels
    known_label: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Build the application router.
pub fn build_router(classifier: Classifier) -> Router {
    let state = AppState {
        classifier: Arc::new(classifier),
        index_html: render_index().into(),
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/classify", post(classify_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(classifier: Classifier, addr: SocketAddr) -> std::io::Result<()> {
    info!(addr = %addr, model = %classifier.model_name(), "Starting HTTP server");
    let app = build_router(classifier);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}

async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.index_html.to_string())
}

/// Health check endpoint
async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "model": state.classifier.model_name(),
    }))
}

/// Classify endpoint handler
async fn classify_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyBody>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Malformed bodies get the same JSON error shape as every other failure
    let Json(body) = payload.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Invalid request body: {}", rejection.body_text()),
            }),
        )
    })?;

    let request = ClassificationRequest::new(body.abstract_text).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.user_message(),
            }),
        )
    })?;

    match state.classifier.classify_request(&request).await {
        Ok(result) => Ok(Json(ClassifyResponse {
            known_label: result.known_label().is_some(),
            label: result.label,
            reason: result.reason,
        })),
        Err(e) => {
            error!(error = %e, "Classification failed");
            let status = if e.is_caller_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::BAD_GATEWAY
            };
            Err((
                status,
                Json(ErrorResponse {
                    error: e.user_message(),
                }),
            ))
        }
    }
}

fn render_index() -> String {
    let template = IndexTemplate {
        example_abstract: EXAMPLE_ABSTRACT,
    };
    template
        .render()
        .unwrap_or_else(|e| format!("Failed to render page: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClassificationError, Result};
    use crate::generator::TextGenerator;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    struct CannedGenerator {
        reply: std::result::Result<&'static str, u16>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(ClassificationError::Api {
                    status,
                    message: "Resource has been exhausted".to_string(),
                }),
            }
        }

        fn model_name(&self) -> &str {
            "canned-model"
        }
    }

    fn setup_test_app(
        reply: std::result::Result<&'static str, u16>,
    ) -> (Router, Arc<CannedGenerator>) {
        let generator = Arc::new(CannedGenerator {
            reply,
            calls: AtomicUsize::new(0),
        });
        let app = build_router(Classifier::new(generator.clone()));
        (app, generator)
    }

    fn classify_request(abstract_text: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/classify")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "abstract": abstract_text }).to_string(),
            ))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_classify_success() {
        let (app, generator) = setup_test_app(Ok(
            "```json\n{\"label\":\"General FA (Genetics/Clinical)\",\"reason\":\"Natural history study.\"}\n```",
        ));

        let response = app
            .oneshot(classify_request("GAA repeat length and age of onset in 200 FA patients."))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["label"], "General FA (Genetics/Clinical)");
        assert_eq!(json["reason"], "Natural history study.");
        assert_eq!(json["known_label"], true);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_classify_unknown_label_passes_through() {
        let (app, _generator) = setup_test_app(Ok(r#"{"label":"Relevant","reason":"FA drug"}"#));

        let response = app.oneshot(classify_request("Omaveloxolone trial.")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["label"], "Relevant");
        assert_eq!(json["known_label"], false);
    }

    #[tokio::test]
    async fn test_classify_empty_abstract_skips_model() {
        let (app, generator) = setup_test_app(Ok(r#"{"label":"Irrelevant","reason":"x"}"#));

        let response = app.oneshot(classify_request("  \n\t ")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Please enter an abstract to classify.");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_classify_malformed_output() {
        let (app, _generator) = setup_test_app(Ok("I cannot comply with this request."));

        let response = app.oneshot(classify_request("Some abstract.")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        let error = json["error"].as_str().unwrap();
        assert!(error.starts_with("An error occurred."));
        assert!(error.contains("Malformed model output"));
        assert!(json.get("label").is_none());
    }

    #[tokio::test]
    async fn test_classify_api_error() {
        let (app, generator) = setup_test_app(Err(429));

        let response = app.oneshot(classify_request("Some abstract.")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("429"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _generator) = setup_test_app(Ok("{}"));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["model"], "canned-model");
    }

    #[tokio::test]
    async fn test_index_page_prefills_example() {
        let (app, _generator) = setup_test_app(Ok("{}"));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Biomedical Abstract Triage Assistant"));
        assert!(html.contains("Friedreich&#x27;s Ataxia (FA), the most common"));
        assert!(!html.contains("example_abstract"));
    }

    #[test]
    fn test_index_template_escapes_abstract() {
        let html = IndexTemplate {
            example_abstract: r#"<script>alert("x")</script> & more"#,
        }
        .render()
        .unwrap();
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; more"));
        assert!(!html.contains("<script>alert"));
    }

    #[tokio::test]
    async fn test_classify_invalid_body_is_json_error() {
        let bodies = [
            (Some("application/json"), r#"{"text":"x"}"#),
            (Some("application/json"), "not json"),
            (None, r#"{"abstract":"Frataxin."}"#),
        ];

        for (content_type, body) in bodies {
            let (app, generator) = setup_test_app(Ok(r#"{"label":"Irrelevant","reason":"x"}"#));
            let mut request = Request::builder().method("POST").uri("/api/classify");
            if let Some(content_type) = content_type {
                request = request.header(header::CONTENT_TYPE, content_type);
            }

            let response = app
                .oneshot(request.body(Body::from(body)).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
            let json = body_json(response).await;
            assert!(json["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request body:"));
            assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        }
    }
}
