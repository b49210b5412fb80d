//! Chat endpoint: one POST operation accepting `{"message": string}` plus an
//! opaque visitor cookie. Deterministic replies come from the order flow;
//! everything else goes to the model fallback dispatcher. Downstream
//! failures are surfaced in-band as chat text with a success status so the
//! widget always has something to display.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use streambot_agent::{DispatchError, FallbackDispatcher};
use streambot_core::{OrderFlow, SessionStore};

pub const SESSION_COOKIE: &str = "streambot_session";

#[derive(Clone)]
pub struct ChatState {
    pub flow: Arc<OrderFlow>,
    pub dispatcher: Arc<FallbackDispatcher>,
    pub sessions: Arc<dyn SessionStore>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct ChatError {
    pub error: String,
}

pub fn router(state: ChatState) -> Router {
    Router::new().route("/api/chat", post(chat)).with_state(state)
}

pub async fn chat(
    State(state): State<ChatState>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(event_name = "chat.bad_request", error = %rejection, "rejected malformed body");
            return (StatusCode::BAD_REQUEST, Json(ChatError { error: "Invalid JSON".to_string() }))
                .into_response();
        }
    };

    let visitor = visitor_identity(&headers);
    let message = request.message.trim();
    if message.is_empty() {
        return reply_response(&visitor, "Please type a message so I can help.".to_string());
    }

    let mut session = state.sessions.load(&visitor.id);
    if let Some(reply) = state.flow.respond(message, &mut session) {
        state.sessions.save(&visitor.id, session);
        info!(event_name = "chat.deterministic_reply", visitor_id = %visitor.id, "order flow handled the message");
        return reply_response(&visitor, reply);
    }

    let reply = match state.dispatcher.reply(message, &session.memory).await {
        Ok(text) => text,
        Err(blocked @ DispatchError::Blocked { .. }) => blocked.to_string(),
        Err(DispatchError::Exhausted(cause)) => {
            error!(
                event_name = "chat.dispatch_exhausted",
                visitor_id = %visitor.id,
                error = %cause,
                "all model candidates failed"
            );
            format!("AI error: {cause}")
        }
    };
    reply_response(&visitor, reply)
}

struct VisitorIdentity {
    id: String,
    minted: bool,
}

/// Visitor key from the session cookie; a fresh one is minted (and set on
/// the response) when the cookie is missing.
fn visitor_identity(headers: &HeaderMap) -> VisitorIdentity {
    let existing = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(session_cookie_value);

    match existing {
        Some(id) => VisitorIdentity { id, minted: false },
        None => VisitorIdentity { id: Uuid::new_v4().to_string(), minted: true },
    }
}

fn session_cookie_value(cookie_header: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, value)| name.trim() == SESSION_COOKIE && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string())
}

fn reply_response(visitor: &VisitorIdentity, reply: String) -> Response {
    let mut response = (StatusCode::OK, Json(ChatReply { reply })).into_response();
    if visitor.minted {
        let cookie =
            format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", visitor.id);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use streambot_agent::{Completion, CompletionClient, FallbackDispatcher, GenerationParams};
    use streambot_core::{MemorySessionStore, OrderFlow};

    use super::{router, ChatState, SESSION_COOKIE};

    /// Completion stub with a single scripted behavior for every model.
    enum StubBehavior {
        Text(&'static str),
        Blocked(&'static str),
        Fail(&'static str),
    }

    struct StubClient {
        behavior: StubBehavior,
    }

    #[async_trait]
    impl CompletionClient for StubClient {
        async fn list_generation_models(&self) -> Result<Vec<String>> {
            Ok(vec!["stub-model".to_string()])
        }

        async fn generate(
            &self,
            _model: &str,
            _params: &GenerationParams,
            _parts: &[String],
        ) -> Result<Completion> {
            match self.behavior {
                StubBehavior::Text(text) => {
                    Ok(Completion { text: text.to_string(), block_reason: None })
                }
                StubBehavior::Blocked(reason) => Ok(Completion {
                    text: String::new(),
                    block_reason: Some(reason.to_string()),
                }),
                StubBehavior::Fail(reason) => Err(anyhow!(reason)),
            }
        }
    }

    fn test_router(behavior: StubBehavior) -> Router {
        let state = ChatState {
            flow: Arc::new(OrderFlow::default()),
            dispatcher: Arc::new(FallbackDispatcher::new(Arc::new(StubClient { behavior }))),
            sessions: Arc::new(MemorySessionStore::new()),
        };
        router(state)
    }

    fn chat_request(message: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, format!("{SESSION_COOKIE}=test-visitor"))
            .body(Body::from(format!(r#"{{"message": {}}}"#, serde_json::json!(message))))
            .expect("request should build")
    }

    async fn reply_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body should read");
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).expect("body should be JSON");
        value["reply"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn non_post_access_is_rejected() {
        let response = test_router(StubBehavior::Text("unused"))
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/chat")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn malformed_json_is_a_client_error() {
        let response = test_router(StubBehavior::Text("unused"))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("not json"))
                    .expect("request should build"),
            )
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes =
            to_bytes(response.into_body(), usize::MAX).await.expect("body should read");
        assert!(String::from_utf8_lossy(&bytes).contains("Invalid JSON"));
    }

    #[tokio::test]
    async fn empty_message_short_circuits_with_a_prompt() {
        let response = test_router(StubBehavior::Fail("should never be called"))
            .oneshot(chat_request("   "))
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(reply_text(response).await, "Please type a message so I can help.");
    }

    #[tokio::test]
    async fn missing_cookie_mints_a_session() {
        let response = test_router(StubBehavior::Text("hello"))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"message": "netflix"}"#))
                    .expect("request should build"),
            )
            .await
            .expect("router should respond");

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(cookie.starts_with(SESSION_COOKIE));
    }

    #[tokio::test]
    async fn order_flow_state_accumulates_across_requests() {
        let router = test_router(StubBehavior::Fail("should never be called"));

        let reservation = router
            .clone()
            .oneshot(chat_request("order 2 netflix"))
            .await
            .expect("router should respond");
        assert!(reply_text(reservation).await.contains("I reserved 2"));

        let confirmation = router
            .clone()
            .oneshot(chat_request("Juan Dela Cruz - juan@email.com"))
            .await
            .expect("router should respond");
        let confirmation_text = reply_text(confirmation).await;
        assert!(confirmation_text.contains("Thanks, Juan Dela Cruz!"));
        assert!(confirmation_text.contains("Streamplus Virtual Receipt"));

        let receipt = router
            .oneshot(chat_request("receipt"))
            .await
            .expect("router should respond");
        assert!(reply_text(receipt).await.contains("Here's your latest receipt"));
    }

    #[tokio::test]
    async fn unmatched_message_uses_the_dispatcher() {
        let response = test_router(StubBehavior::Text("We accept GCash and BPI."))
            .oneshot(chat_request("what payment methods do you accept?"))
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(reply_text(response).await, "We accept GCash and BPI.");
    }

    #[tokio::test]
    async fn blocked_prompt_surfaces_as_chat_text() {
        let response = test_router(StubBehavior::Blocked("SAFETY"))
            .oneshot(chat_request("something the service refuses"))
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            reply_text(response).await,
            "AI blocked the request (SAFETY). Try rephrasing."
        );
    }

    #[tokio::test]
    async fn dispatch_failures_surface_in_band_with_success_status() {
        let response = test_router(StubBehavior::Fail("quota exceeded"))
            .oneshot(chat_request("tell me about bundles"))
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(reply_text(response).await.starts_with("AI error: "));
    }
}
