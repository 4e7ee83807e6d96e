//! HTTP surface: `POST /chat`, `GET /`, `GET /health`.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

pub mod core;
pub mod error_handler;
mod routes;

pub use crate::core::app_state::{ApiConfig, AppState};
pub use crate::error_handler::AppError;

use crate::routes::{chat_route::chat, health_route::health, index_route::index_page};

/// Builds the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/chat", post(chat))
        .route("/health", get(health))
        .with_state(state)
}

/// Binds `address` and serves until Ctrl+C.
///
/// # Errors
/// [`AppError::Bind`] if the address cannot be bound, [`AppError::Server`]
/// if the server loop fails.
pub async fn start(address: &str, state: Arc<AppState>) -> Result<(), AppError> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(AppError::Bind)?;
    info!(%address, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::{future::Future, pin::Pin};

    use ai_llm_service::{AiLlmError, LlmModelConfig, LlmServiceProfiles};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use grounded_chat::{AnswerGenerator, ChatModel, ChatPipeline, PromptPolicy};
    use rag_store::embed::noop_embedder::NoopEmbedder;
    use rag_store::store::local::LocalStore;
    use rag_store::{DistanceKind, Retriever, VectorSpace, VectorStore};
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct EchoChat {
        calls: AtomicUsize,
    }

    impl ChatModel for EchoChat {
        fn complete<'a>(
            &'a self,
            _system: &'a str,
            user: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move { Ok(format!("You asked: {user}")) })
        }
    }

    fn offline_profile(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            model: model.into(),
            endpoint: "http://127.0.0.1:9".into(),
            api_key: None,
            max_tokens: Some(400),
            temperature: Some(0.4),
            top_p: None,
            timeout_secs: Some(1),
        }
    }

    async fn app(dir: &TempDir) -> (Router, Arc<EchoChat>) {
        let store: Arc<dyn VectorStore> = Arc::new(
            LocalStore::open(
                dir.path().join("store"),
                "company",
                VectorSpace {
                    size: 4,
                    distance: DistanceKind::Cosine,
                },
            )
            .await
            .unwrap(),
        );
        let chat = Arc::new(EchoChat {
            calls: AtomicUsize::new(0),
        });
        let retriever = Arc::new(Retriever::new(store.clone(), Arc::new(NoopEmbedder), 4, 4));
        let generator = AnswerGenerator::new(chat.clone(), Arc::new(PromptPolicy::default()));
        let llm = LlmServiceProfiles::new(
            offline_profile("chat"),
            offline_profile("embed"),
            Some(1),
        )
        .unwrap();

        let state = Arc::new(AppState {
            pipeline: Arc::new(ChatPipeline::new(retriever, generator)),
            store,
            llm_profiles: Arc::new(llm),
            index_html_path: dir.path().join("index.html"),
        });
        (router(state), chat)
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn chat_returns_response_field() {
        let dir = tempfile::tempdir().unwrap();
        let (app, chat) = app(&dir).await;

        let resp = app
            .oneshot(post_chat(r#"{"message":"  When was the company founded? "}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["response"], "You asked: When was the company founded?");
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_message_is_bad_request_without_model_call() {
        let dir = tempfile::tempdir().unwrap();
        let (app, chat) = app(&dir).await;

        let resp = app.oneshot(post_chat(r#"{"message":"   "}"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = json_body(resp).await;
        assert_eq!(body["error"], "BAD_REQUEST");
        assert_eq!(body["message"], "Message cannot be empty");
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_bodies_are_bad_requests() {
        let dir = tempfile::tempdir().unwrap();
        for raw in ["not json", r#"{"msg":"hi"}"#, r#"{"message":42}"#] {
            let (app, _) = app(&dir).await;
            let resp = app.oneshot(post_chat(raw)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {raw}");
        }
    }

    #[tokio::test]
    async fn index_serves_html_or_404() {
        let dir = tempfile::tempdir().unwrap();

        let (app_missing, _) = app(&dir).await;
        let resp = app_missing
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        std::fs::write(dir.path().join("index.html"), "<h1>Chat</h1>").unwrap();
        let (app, _) = app(&dir).await;
        let resp = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(
            resp.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>Chat</h1>");
    }

    #[tokio::test]
    async fn health_reports_store_and_providers() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app(&dir).await;

        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["chunks"], 0);
        assert_eq!(body["providers"].as_array().unwrap().len(), 2);
        assert_eq!(body["ok"], false);
        assert!(!Path::new(&dir.path().join("store").join("company.json")).exists());
    }
}
