//! Gateway HTTP server: Axum router around the reply engine

use std::any::Any;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use chrono::{DateTime, Utc};
use salesdm_core::{AgentPersona, AgentRequest, AgentResponse, ChannelId, CoreError, presets};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::protocol::{
    self, ChannelInfo, ERR_INTERNAL, ERR_INVALID_BODY, ERR_MISSING_FIELDS, ErrorBody, RespondBody,
};

/// Shared, read-only state for all requests
#[derive(Clone)]
pub struct GatewayState {
    /// Persona that caller overrides are merged onto
    pub default_persona: Arc<AgentPersona>,
    pub start_time: std::time::Instant,
    pub started_at: DateTime<Utc>,
}

impl GatewayState {
    pub fn new(default_persona: AgentPersona) -> Self {
        Self {
            default_persona: Arc::new(default_persona),
            start_time: std::time::Instant::now(),
            started_at: Utc::now(),
        }
    }
}

/// The gateway server
pub struct GatewayServer {
    state: GatewayState,
    bind: SocketAddr,
}

impl GatewayServer {
    /// Create a new gateway server
    pub fn new(bind: SocketAddr, default_persona: AgentPersona) -> Self {
        Self {
            state: GatewayState::new(default_persona),
            bind,
        }
    }

    pub fn default_persona(&self) -> &AgentPersona {
        &self.state.default_persona
    }

    /// Build the Axum router
    pub fn router(&self) -> Router {
        Router::new()
            .route(protocol::routes::RESPOND, post(respond_handler))
            .route(protocol::routes::STATUS, get(status_handler))
            .route(protocol::routes::PRESETS, get(presets_handler))
            .route(protocol::routes::CHANNELS, get(channels_handler))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Serve until `shutdown` resolves
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
        let router = self.router();
        let listener = tokio::net::TcpListener::bind(self.bind).await?;
        info!("Gateway listening on {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Gateway stopped");
        Ok(())
    }

    /// Start the server in the background, returning a handle
    pub fn spawn(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> tokio::task::JoinHandle<anyhow::Result<()>> {
        tokio::spawn(async move { self.run(shutdown).await })
    }
}

/// Error answered to the client. Internal details stay in the logs.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: ERR_INTERNAL.to_string(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnsupportedChannel(platform) => {
                Self::bad_request(format!("Unsupported platform: {}", platform))
            }
            CoreError::InvariantViolation(reason) => {
                error!("Reply engine failed: {}", reason);
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

// ── HTTP Handlers ──

async fn respond_handler(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<AgentResponse>, ApiError> {
    let body: RespondBody = serde_json::from_slice(&body).map_err(|e| {
        debug!("Rejecting malformed body: {}", e);
        ApiError::bad_request(ERR_INVALID_BODY)
    })?;

    let (message, platform) = match (body.message, body.platform) {
        (Some(m), Some(p)) if !m.is_empty() && !p.is_empty() => (m, p),
        _ => return Err(ApiError::bad_request(ERR_MISSING_FIELDS)),
    };

    let platform: ChannelId = platform.parse().inspect_err(|_| {
        warn!("Rejecting unsupported platform '{}'", platform);
    })?;

    let persona = match &body.persona {
        Some(overrides) => state.default_persona.merged(overrides),
        None => (*state.default_persona).clone(),
    };

    let request = AgentRequest {
        message,
        platform,
        persona,
        customer_name: body.customer_name,
    };

    let request_id = Uuid::new_v4();
    let response = salesdm_core::generate_reply(&request)?;
    info!(
        %request_id,
        platform = %platform,
        intent = %response.intent,
        confidence = response.confidence,
        "Crafted reply"
    );
    Ok(Json(response))
}

async fn status_handler(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "started_at": state.started_at,
        "brand": state.default_persona.brand_name,
    }))
}

async fn presets_handler() -> Json<Vec<AgentPersona>> {
    Json(presets::all())
}

async fn channels_handler() -> Json<Vec<ChannelInfo>> {
    Json(ChannelId::ALL.into_iter().map(ChannelInfo::from).collect())
}

/// Turn a handler panic into the generic 500 body
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Handler panicked: {}", detail);
    ApiError::internal().into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn server() -> GatewayServer {
        GatewayServer::new("127.0.0.1:0".parse().unwrap(), AgentPersona::default())
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn post_respond(body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(protocol::routes::RESPOND)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(server().router(), request).await
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(server().router(), request).await
    }

    #[tokio::test]
    async fn test_respond_ok() {
        let (status, body) = post_respond(
            r#"{"message":"How much is your starter package and do you deliver outside Dhaka?","platform":"whatsapp"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["intent"], "pricing_inquiry");
        assert!(body["confidence"].as_f64().unwrap() > 0.5);
        assert!(body["reply"].as_str().unwrap().contains("Aurora Labs"));
        assert!(
            body["callToAction"]
                .as_str()
                .unwrap()
                .contains("Book your free strategy call")
        );
        assert!(body["followUp"].as_str().unwrap().contains("10 minutes"));
        assert!(!body["suggestedNextSteps"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_respond_merges_persona_override() {
        let (status, body) = post_respond(
            r#"{"message":"hello","platform":"instagram","customerName":"Rina","persona":{"brandName":"Glow Atelier"}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let reply = body["reply"].as_str().unwrap();
        assert!(reply.contains("Glow Atelier"));
        assert!(reply.contains("Rina"));
        // Fields not overridden come from the default persona
        assert!(
            body["callToAction"]
                .as_str()
                .unwrap()
                .contains("Book your free strategy call")
        );
    }

    #[tokio::test]
    async fn test_respond_missing_message() {
        let (status, body) = post_respond(r#"{"platform":"whatsapp"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], ERR_MISSING_FIELDS);
    }

    #[tokio::test]
    async fn test_respond_missing_platform() {
        let (status, body) = post_respond(r#"{"message":"hi"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], ERR_MISSING_FIELDS);
    }

    #[tokio::test]
    async fn test_respond_empty_message() {
        let (status, _) = post_respond(r#"{"message":"","platform":"whatsapp"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_respond_whitespace_message_reaches_fallback() {
        let (status, body) = post_respond(r#"{"message":"   ","platform":"messenger"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["intent"], "unclassified");
        assert!(body["confidence"].as_f64().unwrap() <= 0.3);
    }

    #[tokio::test]
    async fn test_respond_unsupported_platform() {
        let (status, body) = post_respond(r#"{"message":"hi","platform":"telegram"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unsupported platform: telegram");
        assert!(body.get("reply").is_none());
    }

    #[tokio::test]
    async fn test_respond_invalid_json() {
        let (status, body) = post_respond("not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], ERR_INVALID_BODY);
    }

    #[tokio::test]
    async fn test_status() {
        let (status, body) = get_json(protocol::routes::STATUS).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["brand"], "Aurora Labs");
    }

    #[tokio::test]
    async fn test_presets() {
        let (status, body) = get_json(protocol::routes::PRESETS).await;
        assert_eq!(status, StatusCode::OK);
        let presets = body.as_array().unwrap();
        assert_eq!(presets.len(), 3);
        assert_eq!(presets[0]["brandName"], "Glow Atelier");
    }

    #[tokio::test]
    async fn test_channels() {
        let (status, body) = get_json(protocol::routes::CHANNELS).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["whatsapp", "messenger", "instagram"]);
    }

    #[tokio::test]
    async fn test_handle_panic_is_generic_500() {
        let response = handle_panic(Box::new("secret internals"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], ERR_INTERNAL);
    }

    #[test]
    fn test_invariant_error_maps_to_500() {
        let err = ApiError::from(CoreError::InvariantViolation("boom".to_string()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, ERR_INTERNAL);
    }
}
