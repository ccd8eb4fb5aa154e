use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use chatgate_llm::{normalize_bytes, GatewayError};

use crate::error::{ApiError, ChatReply};
use crate::AppState;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat).fallback(method_not_allowed))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `POST /api/chat`. A body the extractor refuses (over the size limit, or a
/// broken stream) is still answered with a JSON `error` object.
async fn chat(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(status = %rejection.status(), "Rejecting unreadable chat body");
            return ApiError(GatewayError::BodyRejected {
                status: rejection.status().as_u16(),
                message: rejection.body_text(),
            })
            .into_response();
        }
    };

    let request = normalize_bytes(&body);
    let reply = state.gateway.dispatch(&request).await;
    ChatReply(reply).into_response()
}

/// Any other method on the chat route. Takes no extractors, so the body is
/// never read.
async fn method_not_allowed() -> Response {
    ApiError(GatewayError::MethodNotAllowed).into_response()
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
