//! HTTP + WebSocket surface for the catalog, chat sessions, and DripSeek.

mod api;
mod ws;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::chat::{Session, SessionStore, TranscriptSnapshot};
use crate::gateway::FashionGateway;
use crate::notify::Notification;

pub use ws::WsEvent;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn FashionGateway>,
    pub sessions: Arc<SessionStore>,
    pub catalog: Arc<Catalog>,
}

/// Build the router with every REST and WebSocket route.
pub fn routes(
    gateway: Arc<dyn FashionGateway>,
    sessions: Arc<SessionStore>,
    catalog: Arc<Catalog>,
) -> Router {
    let state = AppState {
        gateway,
        sessions,
        catalog,
    };

    Router::new()
        .route("/health", get(api::health))
        .route("/api/catalog/products", get(api::list_products))
        .route("/api/catalog/facets", get(api::facets))
        .route("/api/featured", get(api::featured))
        .route("/api/xray", get(api::xray_items))
        .route("/api/xray/{id}/explore", post(api::explore_xray))
        .route("/api/video", get(api::resolve_video))
        .route("/api/dripseek", post(api::dripseek))
        .route("/api/sessions", post(api::create_session))
        .route(
            "/api/sessions/{id}",
            get(api::get_session).delete(api::delete_session),
        )
        .route("/api/sessions/{id}/draft", put(api::set_draft))
        .route(
            "/api/sessions/{id}/attachment",
            post(api::attach_image).delete(api::clear_attachment),
        )
        .route("/api/sessions/{id}/messages", post(api::send_message))
        .route("/ws/sessions/{id}", get(ws::ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JSON view of a session returned by the session endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub transcript: TranscriptSnapshot,
}

impl SessionView {
    async fn of(session: &Session) -> Self {
        let transcript = session.transcript().await.snapshot();
        Self {
            id: session.id,
            created_at: session.created_at,
            transcript,
        }
    }
}

/// Session opened as a side effect of DripSeek or X-Ray, plus the
/// notifications raised while preparing its context.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeededSession<T: Serialize> {
    pub session: SessionView,
    pub notifications: Vec<Notification>,
    #[serde(flatten)]
    pub extra: T,
}

/// Error body: `{"error": "..."}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({"error": self.message})),
        )
            .into_response()
    }
}

async fn lookup_session(state: &AppState, id: &str) -> Result<Arc<Session>, ApiError> {
    let session_id =
        Uuid::parse_str(id).map_err(|_| ApiError::bad_request("Invalid session ID"))?;
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| ApiError::not_found("Session not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::chat::{FALLBACK_REPLY, GREETING};
    use crate::error::GatewayError;
    use crate::gateway::{AssistanceRequest, AssistanceResponse, KeywordsRequest, KeywordsResponse};
    use crate::image::SAMPLE_FRAME;

    struct StubGateway {
        fail: bool,
    }

    #[async_trait]
    impl FashionGateway for StubGateway {
        async fn extract_keywords(
            &self,
            _request: KeywordsRequest,
        ) -> Result<KeywordsResponse, GatewayError> {
            if self.fail {
                return Err(GatewayError::InvalidRequest {
                    reason: "down".into(),
                });
            }
            Ok(KeywordsResponse {
                keywords: "denim jacket, white sneakers".into(),
            })
        }

        async fn answer_fashion_question(
            &self,
            request: AssistanceRequest,
        ) -> Result<AssistanceResponse, GatewayError> {
            if self.fail {
                return Err(GatewayError::InvalidRequest {
                    reason: "down".into(),
                });
            }
            Ok(AssistanceResponse {
                answer: format!("About {}", request.question),
                search_link: None,
            })
        }
    }

    fn app(fail: bool) -> (Router, Arc<SessionStore>) {
        let sessions = SessionStore::new(Duration::from_secs(5));
        let router = routes(
            Arc::new(StubGateway { fail }),
            Arc::clone(&sessions),
            Arc::new(Catalog::builtin()),
        );
        (router, sessions)
    }

    async fn call(
        router: Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (router, _) = app(false);
        let (status, body) = call(router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn products_are_filtered_by_query() {
        let (router, _) = app(false);
        let (status, body) = call(
            router.clone(),
            Method::GET,
            "/api/catalog/products?color=Blue&priceRange=50-100",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["p1"]);

        let (_, all) = call(router, Method::GET, "/api/catalog/products", None).await;
        assert_eq!(all.as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn facets_list_price_buckets() {
        let (router, _) = app(false);
        let (_, body) = call(router, Method::GET, "/api/catalog/facets", None).await;
        assert_eq!(body["priceRanges"][0], "All");
        assert_eq!(body["priceRanges"][4], "200+");
    }

    #[tokio::test]
    async fn video_resolves_or_rejects() {
        let (router, _) = app(false);
        let (status, body) = call(
            router.clone(),
            Method::GET,
            "/api/video?url=https%3A%2F%2Fyoutu.be%2Fia2Ph61bYzc",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["videoId"], "ia2Ph61bYzc");

        let uri = "/api/video?url=https%3A%2F%2Fexample.com";
        let (status, _) = call(router, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let (router, sessions) = app(false);
        let (status, created) = call(
            router.clone(),
            Method::POST,
            "/api/sessions",
            Some(serde_json::json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["transcript"]["messages"][0]["text"], GREETING);
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(sessions.len().await, 1);

        let (status, sent) = call(
            router.clone(),
            Method::POST,
            &format!("/api/sessions/{id}/messages"),
            Some(serde_json::json!({"text": "What goes with chinos?"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sent["outcome"], "answered");
        assert_eq!(sent["messages"][1]["text"], "About What goes with chinos?");

        let (status, _) = call(
            router.clone(),
            Method::POST,
            &format!("/api/sessions/{id}/messages"),
            Some(serde_json::json!({"text": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, fetched) = call(router, Method::GET, &format!("/api/sessions/{id}"), None).await;
        assert_eq!(fetched["transcript"]["messages"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn failed_send_appends_fallback() {
        let (router, _) = app(true);
        let (_, created) = call(
            router.clone(),
            Method::POST,
            "/api/sessions",
            Some(serde_json::json!({})),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, sent) = call(
            router,
            Method::POST,
            &format!("/api/sessions/{id}/messages"),
            Some(serde_json::json!({"text": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sent["outcome"], "failed");
        assert_eq!(sent["messages"][1]["text"], FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn unknown_and_invalid_sessions() {
        let (router, _) = app(false);
        let (status, _) = call(router.clone(), Method::GET, "/api/sessions/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            router,
            Method::GET,
            &format!("/api/sessions/{}", Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Session not found");
    }

    #[tokio::test]
    async fn dripseek_opens_context_session() {
        let (router, _) = app(false);
        let (status, body) =
            call(router, Method::POST, "/api/dripseek", Some(serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["scan"]["keywords"], "denim jacket, white sneakers");
        assert_eq!(
            body["session"]["transcript"]["context"],
            "denim jacket, white sneakers"
        );
        assert_eq!(body["notifications"][0]["kind"], "info");
    }

    #[tokio::test]
    async fn dripseek_failure_still_opens_session() {
        let (router, _) = app(true);
        let (status, body) = call(
            router,
            Method::POST,
            "/api/dripseek",
            Some(serde_json::json!({"frame": SAMPLE_FRAME})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["scan"]["keywords"].is_null());
        assert_eq!(body["notifications"][0]["title"], "DripSeek Error");
    }

    #[tokio::test]
    async fn xray_explore_seeds_with_keywords() {
        let (router, _) = app(false);
        let (status, body) =
            call(router.clone(), Method::POST, "/api/xray/xray1/explore", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body["session"]["transcript"]["context"],
            "vibrant silk scarf floral print"
        );

        let (status, _) = call(router, Method::POST, "/api/xray/nope/explore", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn attachment_round_trip() {
        let (router, _) = app(false);
        let (_, created) = call(
            router.clone(),
            Method::POST,
            "/api/sessions",
            Some(serde_json::json!({})),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        png.extend_from_slice(&[0u8; 16]);
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/sessions/{id}/attachment"))
            .body(Body::from(png))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/sessions/{id}/attachment"))
            .body(Body::from("not an image"))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = call(
            router,
            Method::DELETE,
            &format!("/api/sessions/{id}/attachment"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["transcript"]["attachment"].is_null());
    }
}
