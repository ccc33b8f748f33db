//! Order and health handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::http::request::request_id;
use crate::http::response::{self, ErrorResponse};
use crate::http::server::AppState;

/// Body of `POST /api/v1/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub cid: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub chain: bool,
    pub account: String,
}

/// Pin the content, place a storage order and report its outcome.
pub async fn place_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Response {
    let request_id = request_id(&headers);

    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(request_id = %request_id, error = %rejection, "Malformed order request");
            return ErrorResponse::new(&request_id, "invalid_request", rejection.body_text())
                .into_response_with(StatusCode::BAD_REQUEST);
        }
    };

    let span = tracing::info_span!("order", request_id = %request_id, cid = %body.cid);
    tracing::info!(parent: &span, "Order requested");

    match state.orders.submit(&body.cid).instrument(span).await {
        Ok(placed) => response::from_placed(&request_id, placed),
        Err(e) => response::from_error(&request_id, &e),
    }
}

/// Report whether the chain node is reachable.
pub async fn health(State(state): State<AppState>) -> Response {
    let chain = state.node.is_healthy().await;
    let body = HealthResponse {
        status: if chain { "ok" } else { "degraded" }.to_string(),
        chain,
        account: state.orders.account().to_string(),
    };
    let code = if chain {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(body)).into_response()
}
