use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use chatgate_llm::{GatewayError, GatewayResponse};

/// Inbound failures raised by the HTTP layer itself, before the gateway runs.
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(json!({ "error": self.0.to_string() }));
        match self.0 {
            GatewayError::MethodNotAllowed => {
                (status, [(header::ALLOW, "POST")], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

/// HTTP rendering of a gateway outcome.
pub struct ChatReply(pub GatewayResponse);

impl IntoResponse for ChatReply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.body())).into_response()
    }
}
