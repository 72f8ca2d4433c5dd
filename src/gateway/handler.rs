//! HTTP handlers for the chat API
//!
//! - POST /api/chat — relay a conversation as a server-sent event stream
//! - GET /api/health — provider client status

use crate::gateway::types::{ApiError, ChatRequest, HealthResponse};
use crate::relay::Relay;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use std::convert::Infallible;
use std::sync::Arc;

const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// Shared state for chat handlers
#[derive(Clone)]
pub struct ChatState {
    pub relay: Arc<Relay>,
    /// Configured provider name, reported even when its client is missing
    pub provider: String,
}

/// Create the chat router
pub fn chat_router(state: ChatState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .with_state(state)
}

/// POST /api/chat
async fn chat(State(state): State<ChatState>, body: Bytes) -> Response {
    let request = match ChatRequest::parse(&body) {
        Ok(request) => request,
        Err(message) => {
            tracing::debug!(reason = %message, "Rejected chat request");
            return (StatusCode::BAD_REQUEST, Json(ApiError::bad_request(message))).into_response();
        }
    };

    tracing::debug!(
        messages = request.messages.len(),
        model = request.model.as_deref().unwrap_or("default"),
        "Chat request"
    );

    let frames = state
        .relay
        .relay(request.messages, request.model)
        .map(|event| Ok::<_, Infallible>(event.to_frame()));

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
            (X_ACCEL_BUFFERING, "no"),
        ],
        Body::from_stream(frames),
    )
        .into_response()
}

/// GET /api/health
async fn health(State(state): State<ChatState>) -> impl IntoResponse {
    let status = if state.relay.is_ready() {
        "ok"
    } else {
        "error: client not initialized"
    };

    Json(HealthResponse {
        status: status.to_string(),
        provider: state.provider.clone(),
        model: state.relay.default_model().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::personas::{PersonaRegistry, SCOPE_GUARD_MESSAGE};
    use crate::provider::mock::{ScriptedProvider, UnreachableProvider};
    use crate::provider::CompletionProvider;
    use crate::routing::IntentRouter;
    use axum::http::Request;
    use tower::ServiceExt;

    fn make_app(provider: Option<Arc<dyn CompletionProvider>>) -> Router {
        let registry = Arc::new(PersonaRegistry::builtin().unwrap());
        let router = Arc::new(IntentRouter::new(registry));
        chat_router(ChatState {
            relay: Arc::new(Relay::new(router, provider, "gpt-4o")),
            provider: "openai".to_string(),
        })
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn body_text(resp: Response) -> String {
        let body = axum::body::to_bytes(resp.into_body(), 1024 * 64)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_chat_streams_frames() {
        let provider = Arc::new(ScriptedProvider::with_texts(&["Own the ", "room.\nBreathe."]));
        let resp = make_app(Some(provider))
            .oneshot(post_chat(
                r#"{"messages":[{"role":"user","content":"How do I lead my team?"}]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers[header::CONNECTION], "keep-alive");
        assert_eq!(headers["x-accel-buffering"], "no");

        assert_eq!(
            body_text(resp).await,
            "data: Own the \n\ndata: room.\\nBreathe.\n\n"
        );
    }

    #[tokio::test]
    async fn test_chat_out_of_scope() {
        let resp = make_app(Some(Arc::new(UnreachableProvider)))
            .oneshot(post_chat(
                r#"{"messages":[{"role":"user","content":"What's a good pasta recipe?"}]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let expected = format!("data: {}\n\n", SCOPE_GUARD_MESSAGE.replace('\n', "\\n"));
        assert_eq!(body_text(resp).await, expected);
    }

    #[tokio::test]
    async fn test_chat_without_provider() {
        let resp = make_app(None)
            .oneshot(post_chat(r#"{"messages":[{"role":"user","content":"hello"}]}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_text(resp).await,
            "data: [Error] AI Service client not initialized. Check API keys and provider settings.\n\n"
        );
    }

    #[tokio::test]
    async fn test_chat_rejects_bad_requests() {
        for body in [
            "",
            "{}",
            r#"{"messages":[]}"#,
            r#"{"messages":"hi"}"#,
            r#"{"messages":[{"role":"user"}]}"#,
        ] {
            let resp = make_app(Some(Arc::new(UnreachableProvider)))
                .oneshot(post_chat(body))
                .await
                .unwrap();

            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", body);
            let json = body_json(resp).await;
            assert_eq!(json["error"]["code"], "BAD_REQUEST");
        }
    }

    #[tokio::test]
    async fn test_chat_accepts_body_without_content_type() {
        let provider = Arc::new(ScriptedProvider::with_texts(&["ok"]));
        let req = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .body(Body::from(r#"{"messages":[{"role":"user","content":"hello"}]}"#))
            .unwrap();
        let resp = make_app(Some(provider.clone())).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "data: ok\n\n");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_health_ok() {
        let resp = make_app(Some(Arc::new(UnreachableProvider)))
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["provider"], "openai");
        assert_eq!(json["model"], "gpt-4o");
    }

    #[tokio::test]
    async fn test_health_without_client() {
        let resp = make_app(None)
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let json = body_json(resp).await;
        assert_eq!(json["status"], "error: client not initialized");
        assert_eq!(json["provider"], "openai");
    }
}
